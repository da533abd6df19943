mod state;

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Display;
use std::io::Read;
use std::path::{Path, PathBuf};

use snipcraft_export::{SnippetDirectory, SnippetFile};
use snipcraft_text::{line_ending, LineEdit, LineEnding, TabSize};
use snipcraft_transform::{
    command, OperationStore, Outcome, ReplaceOperation, ReplaceStep, Selection, TransformError,
};

use crate::state::StateFile;

#[derive(Parser)]
#[command(name = "snipcraft")]
#[command(about = "snipcraft: snippet authoring and column alignment")]
#[command(version)]
struct Cli {
    /// JSON file holding the tab-stop counter and saved replace operations
    #[arg(long, global = true, default_value = ".snipcraft.json")]
    state: PathBuf,

    /// Display width of a tab character
    #[arg(long, global = true)]
    tab_size: Option<i64>,

    /// Line ending of input and output (detected from the input when omitted)
    #[arg(long, global = true, value_enum)]
    eol: Option<Eol>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Eol {
    Lf,
    Crlf,
    Native,
}

impl From<Eol> for LineEnding {
    fn from(eol: Eol) -> Self {
        match eol {
            Eol::Lf => LineEnding::Lf,
            Eol::Crlf => LineEnding::Crlf,
            Eol::Native => line_ending::NATIVE,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Align columns around one or more chained separator patterns
    Align {
        /// Separator regexes, chained with `{]` or `[}`
        patterns: String,
        /// Input file (stdin when omitted)
        path: Option<String>,
    },

    /// Toggle choice tab-stop syntax `${N|a,b|}`
    Choice {
        /// Input file (stdin when omitted)
        path: Option<String>,
    },

    /// Wrap the input in a plain tab-stop `${N:text}`
    TabStop {
        /// Input file (stdin when omitted)
        path: Option<String>,
    },

    /// Reset the tab-stop counter
    ResetCounter,

    /// Backslash-escape `$`, `\` and `}`
    Escape {
        /// Input file (stdin when omitted)
        path: Option<String>,
    },

    /// Run ad-hoc find/replace steps in order
    Replace {
        /// A find regex and its replacement template; repeat for more steps
        #[arg(long = "step", num_args = 2, value_names = ["FIND", "REPLACE"], required = true)]
        steps: Vec<String>,
        /// Input file (stdin when omitted)
        path: Option<String>,
    },

    /// Manage and run saved replace operations
    #[command(subcommand)]
    Operation(OperationCommand),

    /// Parse a snippet definition and print its fields as JSON
    Parse {
        /// Input file (stdin when omitted)
        path: Option<String>,
    },

    /// Write a snippet definition to the editor's user snippet folder
    Save {
        /// Input file (stdin when omitted)
        path: Option<String>,
        /// Target folder (defaults to the editor's snippet folder)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Print the file instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum OperationCommand {
    /// List saved operations with their step counts
    List,

    /// Print the steps of an operation
    Show { name: String },

    /// Save an operation, replacing one with the same name
    Add {
        name: String,
        /// A find regex and its replacement template; repeat for more steps
        #[arg(long = "step", num_args = 2, value_names = ["FIND", "REPLACE"], required = true)]
        steps: Vec<String>,
    },

    /// Delete an operation
    Remove { name: String },

    /// Rename an operation
    Rename { from: String, to: String },

    /// Run a saved operation over the input
    Run {
        name: String,
        /// Input file (stdin when omitted)
        path: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let eol = cli.eol.map(LineEnding::from);

    match cli.command {
        Command::Align { patterns, path } => {
            cmd_align(path.as_deref(), &patterns, eol, TabSize::resolve(cli.tab_size))
        }
        Command::Choice { path } => cmd_choice(path.as_deref(), &cli.state, eol),
        Command::TabStop { path } => cmd_tab_stop(path.as_deref(), &cli.state, eol),
        Command::ResetCounter => cmd_reset_counter(&cli.state),
        Command::Escape { path } => cmd_escape(path.as_deref(), eol),
        Command::Replace { steps, path } => cmd_replace(path.as_deref(), &steps, eol),
        Command::Operation(op) => cmd_operation(op, &cli.state, eol),
        Command::Parse { path } => cmd_parse(path.as_deref()),
        Command::Save {
            path,
            dir,
            dry_run,
        } => cmd_save(path.as_deref(), dir, dry_run, eol),
    }
}

fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("{context}: {err}");
    std::process::exit(1);
}

fn read_source(path: Option<&str>) -> String {
    let Some(path) = path else {
        let mut source = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut source) {
            fail("Error reading stdin", e);
        }
        return source;
    };

    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => fail(&format!("Error reading {path}"), e),
    }
}

fn open_state(path: &Path) -> StateFile {
    match StateFile::open(path) {
        Ok(state) => state,
        Err(e) => fail(&format!("Error reading state {}", path.display()), e),
    }
}

fn write_state(state: &StateFile) {
    if let Err(e) = state.write() {
        fail(&format!("Error writing state {}", state.path().display()), e);
    }
}

/// The whole input as the selection, trailing line break excluded.
fn selection(source: &str, eol: Option<LineEnding>) -> (Selection, &str) {
    let eol = eol.unwrap_or_else(|| LineEnding::detect(source));
    let (text, trailer) = match source.strip_suffix(eol.as_str()) {
        Some(text) => (text, eol.as_str()),
        None => (source, ""),
    };
    (Selection::new(text, 0, eol), trailer)
}

fn apply_edits(selection: &Selection, edits: &[LineEdit]) -> String {
    let eol = selection.line_ending.as_str();
    let mut lines: Vec<&str> = selection.text.split(eol).collect();
    for edit in edits {
        let index = edit.line_number.checked_sub(selection.start_line);
        if let Some(line) = index.and_then(|i| lines.get_mut(i)) {
            *line = &edit.text;
        }
    }
    lines.join(eol)
}

/// Print the selection after `outcome`, or the unchanged input plus a notice.
fn emit(selection: &Selection, trailer: &str, outcome: Outcome) {
    let text = match outcome {
        Outcome::Replace(text) => text,
        Outcome::ReplaceDocument(document) => {
            print!("{document}");
            return;
        }
        Outcome::ReplaceLines(edits) => apply_edits(selection, &edits),
        Outcome::Notice(notice) => {
            eprintln!("{notice}");
            selection.text.clone()
        }
    };
    print!("{text}{trailer}");
}

fn cmd_align(path: Option<&str>, patterns: &str, eol: Option<LineEnding>, tab_size: TabSize) {
    let source = read_source(path);
    let (sel, trailer) = selection(&source, eol);
    match command::align_selection(Some(&sel), patterns, tab_size) {
        Ok(outcome) => emit(&sel, trailer, outcome),
        Err(e) => fail("Align error", e),
    }
}

fn cmd_choice(path: Option<&str>, state_path: &Path, eol: Option<LineEnding>) {
    let source = read_source(path);
    let (sel, trailer) = selection(&source, eol);
    let mut state = open_state(state_path);
    let newline = eol.unwrap_or(line_ending::NATIVE);

    let outcome = command::toggle_choice(Some(&sel), &mut state, newline);
    write_state(&state);
    emit(&sel, trailer, outcome);
}

fn cmd_tab_stop(path: Option<&str>, state_path: &Path, eol: Option<LineEnding>) {
    let source = read_source(path);
    let (sel, trailer) = selection(&source, eol);
    let mut state = open_state(state_path);

    let outcome = command::insert_tab_stop(Some(&sel), &mut state);
    write_state(&state);
    emit(&sel, trailer, outcome);
}

fn cmd_reset_counter(state_path: &Path) {
    let mut state = open_state(state_path);
    command::reset_counter(&mut state);
    write_state(&state);
    eprintln!("Tab-stop counter reset");
}

fn cmd_escape(path: Option<&str>, eol: Option<LineEnding>) {
    let source = read_source(path);
    let (sel, trailer) = selection(&source, eol);
    let outcome = command::escape_selection(Some(&sel), &source);
    emit(&sel, trailer, outcome);
}

fn parse_steps(values: &[String]) -> Vec<ReplaceStep> {
    values
        .chunks(2)
        .map(|pair| ReplaceStep::new(pair[0].as_str(), pair.get(1).map_or("", String::as_str)))
        .collect()
}

fn report_transform_error(err: TransformError) -> ! {
    if let TransformError::ReplaceStepFailed { committed, .. } = &err {
        print!("{committed}");
    }
    fail("Replace error", err);
}

fn cmd_replace(path: Option<&str>, steps: &[String], eol: Option<LineEnding>) {
    let source = read_source(path);
    let (sel, trailer) = selection(&source, eol);
    let operation = ReplaceOperation::new("(ad-hoc)", parse_steps(steps));
    match operation.apply(&sel.text) {
        Ok(text) => emit(&sel, trailer, Outcome::Replace(text)),
        Err(e) => report_transform_error(e),
    }
}

/// `name<TAB>N steps` for each saved operation, in store order.
fn operation_summaries(store: &OperationStore) -> Vec<String> {
    store
        .list()
        .iter()
        .map(|op| {
            let unit = if op.steps.len() == 1 { "step" } else { "steps" };
            format!("{}\t{} {unit}", op.name, op.steps.len())
        })
        .collect()
}

fn cmd_operation(op: OperationCommand, state_path: &Path, eol: Option<LineEnding>) {
    let mut state = open_state(state_path);
    let mut store = OperationStore::load(&state);

    match op {
        OperationCommand::List => {
            for line in operation_summaries(&store) {
                println!("{line}");
            }
        }
        OperationCommand::Show { name } => match store.get(&name) {
            Some(operation) => {
                for step in &operation.steps {
                    println!("{}\t{}", step.find, step.replace);
                }
            }
            None => fail("Operation error", TransformError::UnknownOperation(name)),
        },
        OperationCommand::Add { name, steps } => {
            let replaced = store.upsert(ReplaceOperation::new(name.as_str(), parse_steps(&steps)));
            store.save(&mut state);
            write_state(&state);
            eprintln!("{} operation '{name}'", if replaced { "Updated" } else { "Saved" });
        }
        OperationCommand::Remove { name } => {
            if store.remove(&name).is_none() {
                fail("Operation error", TransformError::UnknownOperation(name));
            }
            store.save(&mut state);
            write_state(&state);
            eprintln!("Removed operation '{name}'");
        }
        OperationCommand::Rename { from, to } => {
            if let Err(e) = store.rename(&from, &to) {
                fail("Operation error", e);
            }
            store.save(&mut state);
            write_state(&state);
            eprintln!("Renamed operation '{from}' to '{to}'");
        }
        OperationCommand::Run { name, path } => {
            let source = read_source(path.as_deref());
            let (sel, trailer) = selection(&source, eol);
            match command::run_operation(&store, &name, Some(&sel)) {
                Ok(outcome) => emit(&sel, trailer, outcome),
                Err(e) => report_transform_error(e),
            }
        }
    }
}

fn cmd_parse(path: Option<&str>) {
    let source = read_source(path);
    match snipcraft_grammar::parse(&source) {
        Ok(snippet) => match serde_json::to_string_pretty(&snippet) {
            Ok(json) => println!("{json}"),
            Err(e) => fail("Error serializing snippet", e),
        },
        Err(e) => {
            eprintln!("{}", e.format(path.unwrap_or("<stdin>"), &source));
            std::process::exit(1);
        }
    }
}

fn snippet_folder() -> PathBuf {
    let mut directory = SnippetDirectory::from_env();
    if directory.portable.as_deref().is_some_and(|p| !p.is_dir()) {
        log::debug!("portable data path does not exist, using the user folder");
        directory.portable = None;
    }
    match directory.resolve() {
        Ok(folder) => folder,
        Err(e) => fail("Error locating snippet folder", e),
    }
}

fn cmd_save(path: Option<&str>, dir: Option<PathBuf>, dry_run: bool, eol: Option<LineEnding>) {
    let source = read_source(path);
    let snippet = match snipcraft_grammar::parse(&source) {
        Ok(snippet) => snippet,
        Err(e) => {
            eprintln!("{}", e.format(path.unwrap_or("<stdin>"), &source));
            std::process::exit(1);
        }
    };

    let newline = eol.unwrap_or(line_ending::NATIVE);
    let file = match SnippetFile::new(&snippet, &source, newline) {
        Ok(file) => file,
        Err(e) => fail("Export error", e),
    };

    if dry_run {
        println!("{}", file.file_name);
        println!("{}", file.content);
        return;
    }

    let folder = dir.unwrap_or_else(snippet_folder);
    let target = folder.join(&file.file_name);
    if let Err(e) = std::fs::write(&target, &file.content) {
        fail(&format!("Error writing {}", target.display()), e);
    }

    eprintln!("{} created!", file.file_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snipcraft_transform::{MemoryStore, Notice};

    fn lf(text: &str) -> Selection {
        Selection::new(text, 0, LineEnding::Lf)
    }

    #[test]
    fn test_selection_strips_trailing_newline() {
        let (sel, trailer) = selection("a=1\nbb=2\n", None);
        assert_eq!(sel.text, "a=1\nbb=2");
        assert_eq!(trailer, "\n");
        assert!(!sel.is_single_line);
    }

    #[test]
    fn test_selection_detects_crlf() {
        let (sel, trailer) = selection("a\r\nb\r\n", None);
        assert_eq!(sel.line_ending, LineEnding::Crlf);
        assert_eq!(sel.text, "a\r\nb");
        assert_eq!(trailer, "\r\n");
    }

    #[test]
    fn test_selection_single_line_without_newline() {
        let (sel, trailer) = selection("a,b", None);
        assert!(sel.is_single_line);
        assert_eq!(trailer, "");
    }

    #[test]
    fn test_apply_edits_replaces_changed_lines() {
        let sel = lf("a=1\nbb=2\nplain");
        let edits = vec![
            LineEdit {
                line_number: 0,
                text: "a  = 1".to_string(),
            },
            LineEdit {
                line_number: 1,
                text: "bb = 2".to_string(),
            },
        ];
        assert_eq!(apply_edits(&sel, &edits), "a  = 1\nbb = 2\nplain");
    }

    #[test]
    fn test_align_through_command_layer() {
        let sel = lf("x=1\nlong=2");
        let outcome = command::align_selection(Some(&sel), "=", TabSize::new(4)).unwrap();
        let Outcome::ReplaceLines(edits) = outcome else {
            panic!("expected line edits");
        };
        assert_eq!(apply_edits(&sel, &edits), "x    = 1\nlong = 2");
    }

    #[test]
    fn test_missing_tab_size_counts_tabs_as_one_column() {
        let cli = Cli::parse_from(["snipcraft", "align", "="]);
        let tab_size = TabSize::resolve(cli.tab_size);
        let sel = lf("\tx=1\nab=2");
        let outcome = command::align_selection(Some(&sel), "=", tab_size).unwrap();
        let Outcome::ReplaceLines(edits) = outcome else {
            panic!("expected line edits");
        };
        assert_eq!(apply_edits(&sel, &edits), "\tx = 1\nab = 2");
    }

    #[test]
    fn test_operation_summaries() {
        let store = OperationStore::new(vec![
            ReplaceOperation::new("snake", vec![ReplaceStep::new("a", "b")]),
            ReplaceOperation::new(
                "trim",
                vec![ReplaceStep::new("^ +", ""), ReplaceStep::new(" +$", "")],
            ),
        ]);
        assert_eq!(
            operation_summaries(&store),
            vec!["snake\t1 step".to_string(), "trim\t2 steps".to_string()]
        );
    }

    #[test]
    fn test_parse_steps_pairs_values() {
        let values: Vec<String> = ["a", "b", "c", "d"].map(String::from).to_vec();
        let steps = parse_steps(&values);
        assert_eq!(steps, vec![ReplaceStep::new("a", "b"), ReplaceStep::new("c", "d")]);
    }

    #[test]
    fn test_eol_argument() {
        assert_eq!(LineEnding::from(Eol::Crlf), LineEnding::Crlf);
        assert_eq!(LineEnding::from(Eol::Lf), LineEnding::Lf);
        assert_eq!(LineEnding::from(Eol::Native), line_ending::NATIVE);
    }

    #[test]
    fn test_empty_selection_is_a_notice() {
        let sel = lf("");
        let mut store = MemoryStore::default();
        let outcome = command::toggle_choice(Some(&sel), &mut store, LineEnding::Lf);
        assert_eq!(outcome, Outcome::Notice(Notice::EmptyInput));
        assert!(store.values.is_empty());
    }
}
