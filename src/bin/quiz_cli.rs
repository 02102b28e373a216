// src/bin/quiz_cli.rs

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use quiz_cert::{
    certificate::{CertificateExporter, CertificateView, DirectorySink, ExportOutcome},
    config::Config,
    models::identity::Identity,
    quiz::{
        BlockReason, Notice, Outcome, QuestionBank, QuizController, QuizEvent, QuizSession,
        SessionObserver, Severity,
    },
    sync::HttpScoreClient,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quiz-cli", about = "Take the training quiz and download the certificate")]
struct Cli {
    /// Base URL of the score API. Defaults to `API_BASE_URL`.
    #[arg(long)]
    api_url: Option<String>,

    /// Email of the participant. Without it nothing is persisted.
    #[arg(long, env = "QUIZ_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "QUIZ_FULL_NAME")]
    name: Option<String>,

    #[arg(long, env = "QUIZ_COMPANY")]
    company: Option<String>,

    /// JSON question bank replacing the built-in one.
    #[arg(long)]
    bank: Option<PathBuf>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the quiz interactively.
    Take,
    /// Generate `certificat.pdf` for the participant.
    Certificate {
        /// Output directory. Defaults to `CERTIFICATE_DIR`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    fn identity(&self) -> Option<Identity> {
        let email = self.email.as_ref()?;
        let mut identity = Identity::new(email);
        identity.full_name = self.name.clone();
        identity.company_name = self.company.clone();
        Some(identity)
    }
}

/// Prints every state change and notice to the terminal.
struct TerminalObserver;

impl SessionObserver for TerminalObserver {
    fn state_changed(&mut self, session: &QuizSession) {
        if let (Some(index), Some(question)) = (session.current_index(), session.current_question())
        {
            println!();
            println!(
                "Question {}/{} [{:.0}%]",
                index + 1,
                session.total(),
                session.progress() * 100.0
            );
            println!("{}", question.prompt);
            for (i, option) in question.options.iter().enumerate() {
                let marker = if session.answer(index) == Some(i) { '*' } else { ' ' };
                println!(" {marker} {}) {}", i + 1, option.text);
            }
            println!("[1-{}] answer, n next, p previous, q quit", question.options.len());
        }
    }

    fn notice(&mut self, notice: &Notice) {
        match notice.severity {
            Severity::Info => println!("-- {notice}"),
            Severity::Destructive => eprintln!("!! {notice}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref().unwrap_or(&config.api_base_url);
    let timeout = Duration::from_secs(cli.timeout_secs.unwrap_or(config.http_timeout_secs));
    let client = HttpScoreClient::new(api_url, timeout)?;

    match &cli.command {
        Command::Take => {
            let bank_path = cli.bank.as_deref().or(config.question_bank_path.as_deref());
            let bank = Arc::new(QuestionBank::load_or_builtin(bank_path)?);
            take_quiz(bank, client, cli.identity()).await?;
        }
        Command::Certificate { out } => {
            let identity = cli.identity();
            let today = chrono::Local::now().date_naive();
            if let CertificateView::Unauthenticated { message } =
                CertificateExporter::view(identity.as_ref(), today)
            {
                println!("{message}");
                return Ok(());
            }

            let out = out.clone().unwrap_or_else(|| config.certificate_dir.clone());
            let exporter =
                CertificateExporter::new(Arc::new(DirectorySink::new(out)), Arc::new(client));
            match exporter.export(identity.as_ref()).await {
                ExportOutcome::Saved { path, notified } => {
                    println!("Certificate saved to {}", path.display());
                    if !notified {
                        eprintln!("!! The server could not record the certificate.");
                    }
                }
                ExportOutcome::Failed { reason } => eprintln!("!! Certificate export failed: {reason}"),
                ExportOutcome::Unauthenticated => println!("Please sign in to view your certificate."),
            }
        }
    }

    Ok(())
}

async fn take_quiz(
    bank: Arc<QuestionBank>,
    client: HttpScoreClient,
    identity: Option<Identity>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller =
        QuizController::new(bank, client, identity).with_observer(Box::new(TerminalObserver));
    controller.mount().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if let Some(results) = controller.results() {
            println!();
            println!("{results}");
            println!("r restart, q quit");
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        let event = match input {
            "q" => break,
            "n" => QuizEvent::Next,
            "p" => QuizEvent::Previous,
            "r" => QuizEvent::Restart,
            other => {
                let Some(question) = controller.session().current_index() else {
                    continue;
                };
                let options = controller
                    .session()
                    .current_question()
                    .map_or(0, |q| q.options.len());
                match other.parse::<usize>() {
                    Ok(choice) if (1..=options).contains(&choice) => QuizEvent::SelectAnswer {
                        question,
                        option: choice - 1,
                    },
                    _ => {
                        println!("Unknown command: {other}");
                        continue;
                    }
                }
            }
        };

        let transition = controller.dispatch(event).await;
        match transition.outcome {
            Outcome::Blocked(BlockReason::Unanswered) => println!("Select an answer first."),
            Outcome::Blocked(BlockReason::Completed) => println!("The quiz is finished."),
            Outcome::Unchanged | Outcome::Applied => {}
        }
    }

    Ok(())
}
