use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use espalier::{parse_tree, tree_to_dot, tree_to_json, validate_tree, Config, DecisionTree, DotConfig};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "espalier")]
#[command(version, about = "Architecture decision tree tooling. Parse, validate and export decision trees authored in YAML.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a tree and report validation errors
    Validate {
        /// YAML document (defaults to the configured tree file)
        file: Option<PathBuf>,

        /// Emit errors as a JSON array instead of colored text
        #[arg(long)]
        json: bool,
    },

    /// Print a summary of the parsed tree
    Show {
        /// YAML document (defaults to the configured tree file)
        file: Option<PathBuf>,
    },

    /// Export the tree as Graphviz DOT
    Dot {
        /// YAML document (defaults to the configured tree file)
        file: Option<PathBuf>,

        /// Graph title (defaults to the tree name)
        #[arg(short, long)]
        title: Option<String>,

        /// Orientation: TB or LR
        #[arg(long)]
        rankdir: Option<String>,
    },

    /// Export the resolved tree as JSON
    Json {
        /// YAML document (defaults to the configured tree file)
        file: Option<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load();

    let code = match cli.command {
        Command::Validate { file, json } => cmd_validate(file, json, &config),
        Command::Show { file } => cmd_show(file, &config),
        Command::Dot {
            file,
            title,
            rankdir,
        } => cmd_dot(file, title, rankdir, &config),
        Command::Json { file } => cmd_json(file, &config),
        Command::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "espalier", &mut std::io::stdout());
            0
        }
    };

    std::process::exit(code);
}

/// Read and parse the document, or report why we can't. Exit code 2 is
/// reserved for unreadable or unparsable input.
fn load_tree(file: Option<PathBuf>, config: &Config) -> Result<DecisionTree, i32> {
    let path = file.unwrap_or_else(|| PathBuf::from(&config.tree.file));

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}", format!("Failed to read {}: {}", path.display(), e).red());
            return Err(2);
        }
    };

    match parse_tree(&source) {
        Ok(tree) => Ok(tree),
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            Err(2)
        }
    }
}

fn cmd_validate(file: Option<PathBuf>, json: bool, config: &Config) -> i32 {
    let tree = match load_tree(file, config) {
        Ok(tree) => tree,
        Err(code) => return code,
    };

    let errors = validate_tree(&tree);

    if json {
        match serde_json::to_string_pretty(&errors) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("{}", format!("Failed to serialize errors: {}", e).red());
                return 2;
            }
        }
    } else if errors.is_empty() {
        println!(
            "{} {} ({} decisions, {} roots)",
            "✓".green(),
            tree.name.bold(),
            tree.decisions.len(),
            tree.root_decisions.len()
        );
    } else {
        for error in &errors {
            eprintln!("{} {}", "✗".red(), error.red());
        }
        eprintln!(
            "\n{}",
            format!("{} validation error(s) found", errors.len()).bold()
        );
    }

    if errors.is_empty() {
        0
    } else {
        1
    }
}

fn cmd_show(file: Option<PathBuf>, config: &Config) -> i32 {
    let tree = match load_tree(file, config) {
        Ok(tree) => tree,
        Err(code) => return code,
    };

    println!("{}", tree.name.bold());
    if let Some(description) = &tree.description {
        println!("{}", description);
    }
    println!(
        "{} decisions, {} roots",
        tree.decisions.len(),
        tree.root_decisions.len()
    );
    println!();

    let mut visited = HashSet::new();
    for root in &tree.root_decisions {
        print_subtree(&tree, root, 0, &mut visited);
    }

    warn_validation(&tree);
    0
}

/// Indented listing from the roots. The visited set keeps a decision
/// from printing once per parent and bounds traversal on cyclic input.
fn print_subtree(tree: &DecisionTree, id: &str, depth: usize, visited: &mut HashSet<String>) {
    let Some(decision) = tree.decisions.get(id) else {
        return;
    };

    let marker = match decision.selected_path {
        Some(true) => "✓".green().to_string(),
        Some(false) => "✗".red().to_string(),
        None => "·".dimmed().to_string(),
    };
    println!(
        "{}{} {} {}",
        "  ".repeat(depth),
        marker,
        decision.id.cyan(),
        decision.title
    );

    if !visited.insert(id.to_string()) {
        return;
    }
    for child in &decision.children {
        print_subtree(tree, child, depth + 1, visited);
    }
}

fn cmd_dot(
    file: Option<PathBuf>,
    title: Option<String>,
    rankdir: Option<String>,
    config: &Config,
) -> i32 {
    let tree = match load_tree(file, config) {
        Ok(tree) => tree,
        Err(code) => return code,
    };

    let dot_config = DotConfig {
        title,
        show_status: config.dot.show_status,
        show_ids: config.dot.show_ids,
        rankdir: rankdir.unwrap_or_else(|| config.dot.rankdir.clone()),
    };

    print!("{}", tree_to_dot(&tree, &dot_config));
    warn_validation(&tree);
    0
}

fn cmd_json(file: Option<PathBuf>, config: &Config) -> i32 {
    let tree = match load_tree(file, config) {
        Ok(tree) => tree,
        Err(code) => return code,
    };

    match tree_to_json(&tree) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("{}", format!("Failed to serialize tree: {}", e).red());
            return 2;
        }
    }

    warn_validation(&tree);
    0
}

/// Exports still run on an inconsistent tree; validation is advisory.
/// Problems go to stderr so piped stdout stays clean.
fn warn_validation(tree: &DecisionTree) {
    let errors = validate_tree(tree);
    if errors.is_empty() {
        return;
    }
    for error in &errors {
        eprintln!("{} {}", "warning:".yellow(), error);
    }
}
