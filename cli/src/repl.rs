// Interactive REPL: banner, slash commands, and the per-message turn loop.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use orangutan_config::{Config, build_auto_config, config_exists, write_project_file};
use orangutan_core::report::{REPORT_END, REPORT_START};
use orangutan_core::{
    ConsoleReporter, ConversationState, OllamaClient, PromptAnswer, PromptService, TokenSink,
    ToolContext, TurnOutcome, build_directory_tree, build_system_prompt, contains_report,
    default_registry, format_report, run_turn,
};

const ORANGE: &str = "\x1b[38;5;208m";
const DIM: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const TREE_DEPTH: usize = 4;

const BANNER_ART: &str = r#"
   ___                            _
  / _ \ _ __ __ _ _ __   __ _ _  _| |_ __ _ _ __
 | | | | '__/ _` | '_ \ / _` | | | | __/ _` | '_ \
 | |_| | | | (_| | | | | (_| | |_| | || (_| | | | |
  \___/|_|  \__,_|_| |_|\__, |\__,_|\__\__,_|_| |_|
                         |___/
"#;

const HELP_TEXT: &str = "
Commands:
  /help     Show this help message
  /exit     Exit Orangutan Code
  /clear    Clear conversation history
  /tree     Show project directory tree
";

/// Streams model tokens straight to the terminal. While a request is waiting
/// for its first token, a dim "Thinking..." line is shown and then cleared.
struct StdoutSink<W: Write> {
    out: W,
    waiting: bool,
}

impl<W: Write> StdoutSink<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            waiting: false,
        }
    }
}

impl<W: Write + Send> TokenSink for StdoutSink<W> {
    fn on_wait(&mut self) {
        let _ = write!(self.out, "{DIM}  Thinking...{RESET}");
        let _ = self.out.flush();
        self.waiting = true;
    }

    fn on_token(&mut self, token: &str) {
        if self.waiting {
            let _ = write!(self.out, "\r\x1b[K");
            self.waiting = false;
        }
        let _ = write!(self.out, "{token}");
        let _ = self.out.flush();
    }
}

/// Numbered stdin prompt for ask_user.
struct TerminalPrompt;

impl TerminalPrompt {
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl PromptService for TerminalPrompt {
    fn select(&self, question: &str, options: &[String]) -> PromptAnswer {
        println!("\n{BOLD}{question}{RESET}");
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        loop {
            print!("{ORANGE}  Select [1-{}]:{RESET} ", options.len());
            let _ = io::stdout().flush();
            let Some(line) = self.read_line() else {
                return PromptAnswer::Cancelled;
            };
            if line.is_empty() {
                continue;
            }
            if let Ok(n) = line.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return PromptAnswer::Selected(options[n - 1].clone());
                }
                println!("  Pick a number between 1 and {}.", options.len());
                continue;
            }
            // Anything non-numeric is a typed custom answer.
            return PromptAnswer::Text(line);
        }
    }

    fn input(&self, question: &str) -> PromptAnswer {
        print!("\n{BOLD}{question}{RESET} ");
        let _ = io::stdout().flush();
        match self.read_line() {
            Some(line) if !line.is_empty() => PromptAnswer::Text(line),
            _ => PromptAnswer::Cancelled,
        }
    }
}

/// Clear the plain streamed report lines and reprint them in color.
///
/// Streaming already printed the report without colors; this moves the
/// cursor up over those lines, wipes them, and writes the colorized block.
fn reprint_colored_report(text: &str) {
    let Some(start) = text.find(REPORT_START) else {
        return;
    };
    let Some(end) = text.find(REPORT_END) else {
        return;
    };
    let block = &text[start..end + REPORT_END.len()];
    let lines = block.split('\n').count();

    let mut out = io::stdout();
    let _ = write!(out, "\x1b[{lines}A");
    for _ in 0..lines {
        let _ = write!(out, "\x1b[2K\x1b[1B");
    }
    let _ = write!(out, "\x1b[{lines}A");
    let _ = writeln!(out, "{}", format_report(block));
    let _ = out.flush();
}

fn offer_auto_config(cwd: &Path, prompt: &TerminalPrompt) {
    let answer = prompt.select(
        "No orangutan.md found for this project. Generate one from project analysis?",
        &["Yes, generate it".to_string(), "No, skip".to_string()],
    );
    if !matches!(answer, PromptAnswer::Selected(ref choice) if choice.starts_with("Yes")) {
        return;
    }

    let tree = build_directory_tree(cwd, TREE_DEPTH);
    let generated = build_auto_config(cwd, &tree);
    match write_project_file(cwd, &generated) {
        Ok(path) => println!("  Wrote {}. Edit it anytime.\n", path.display()),
        Err(e) => warn!("could not write orangutan.md: {e}"),
    }
}

fn read_user_input() -> Option<String> {
    print!("{ORANGE}>{RESET} ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

pub async fn run(cwd: PathBuf, config: Config) -> Result<()> {
    println!("{BANNER_ART}");
    println!("  Orangutan Code v{} - AI Coding Assistant", env!("CARGO_PKG_VERSION"));
    println!("  Model: {} (local via Ollama)", config.model);
    println!("  Type /help for commands, /exit to quit.");
    println!("\n  Working directory: {}\n", cwd.display());

    let prompt = Arc::new(TerminalPrompt);
    if !config_exists(&cwd) {
        offer_auto_config(&cwd, &prompt);
    }

    let registry = default_registry(prompt);
    let ctx = ToolContext {
        root: cwd.clone(),
        command_timeout: Duration::from_secs(config.command_timeout_secs),
        reporter: Arc::new(ConsoleReporter),
    };
    let client = OllamaClient::new(&config);

    let system = build_system_prompt(&cwd, registry.list_specs());
    let mut state = ConversationState::new(system);

    // One SIGINT handler for the whole session; each Ctrl-C cancels
    // whichever turn token is current. A fresh token is swapped in per turn,
    // so an interrupt at the idle prompt cannot poison the next turn.
    let turn_cancel: Arc<Mutex<CancellationToken>> =
        Arc::new(Mutex::new(CancellationToken::new()));
    let signal_slot = turn_cancel.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if let Ok(token) = signal_slot.lock() {
                token.cancel();
            }
        }
    });

    loop {
        let Some(input) = read_user_input() else {
            println!("\nGoodbye!");
            return Ok(());
        };
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            match command.to_lowercase().as_str() {
                "exit" | "quit" => {
                    println!("Goodbye!");
                    return Ok(());
                }
                "help" => println!("{HELP_TEXT}"),
                "clear" => {
                    let system = build_system_prompt(&cwd, registry.list_specs());
                    state.reset(Some(system));
                    println!("  Conversation cleared.\n");
                }
                "tree" => println!("{}\n", build_directory_tree(&cwd, TREE_DEPTH)),
                _ => println!("  Unknown command: {input}\n"),
            }
            continue;
        }

        state.push_user(input);
        println!();

        let cancel = CancellationToken::new();
        if let Ok(mut slot) = turn_cancel.lock() {
            *slot = cancel.clone();
        }

        let outcome = run_turn(
            &client,
            &mut state,
            &registry,
            &ctx,
            config.max_tool_rounds,
            &mut StdoutSink::new(io::stdout()),
            &cancel,
        )
        .await;

        match outcome {
            Ok(TurnOutcome::Completed { text }) => {
                println!();
                if contains_report(&text) {
                    reprint_colored_report(&text);
                }
            }
            Ok(TurnOutcome::RoundLimit { .. }) => {
                println!("\n{DIM}  [tool round limit reached; send a message to continue]{RESET}");
            }
            Ok(TurnOutcome::Cancelled { .. }) => {
                println!("\n{DIM}  [interrupted]{RESET}");
            }
            Err(e) => {
                println!("\n  [model error] {e}");
            }
        }
        println!();
    }
}
