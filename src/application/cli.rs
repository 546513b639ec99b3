use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Languages;
use crate::domain::models::LANGUAGES;
use crate::infrastructure::api::http::HttpApi;
use crate::infrastructure::api::ApiClient;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn print_sessions_list() -> Result<()> {
    let sessions = HttpApi::default().list_sessions().await?;

    if sessions.is_empty() {
        println!("There are no chat sessions yet. Upload a PDF to start your first one!");
        return Ok(());
    }

    let lines = sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let n = idx + 1;
            return format!(
                "- ({n}) {title}, {count} questions, ID: {id}",
                title = session.title,
                count = session.question_count(),
                id = session.id
            );
        })
        .collect::<Vec<String>>();

    println!("{}", lines.join("\n"));
    return Ok(());
}

fn print_languages_list() {
    let lines = LANGUAGES
        .iter()
        .map(|(code, name)| {
            return format!("- {code}: {name}");
        })
        .collect::<Vec<String>>();

    println!("{}", lines.join("\n"));
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn arg_server_url() -> Arg {
    return Arg::new(ConfigKey::ServerURL.to_string())
        .short('s')
        .long(ConfigKey::ServerURL.to_string())
        .env("PDFCHAT_SERVER_URL")
        .num_args(1)
        .help(format!(
            "Base URL of the document question-answering service. [default: {}]",
            Config::default(ConfigKey::ServerURL)
        ));
}

fn arg_language() -> Arg {
    return Arg::new(ConfigKey::Language.to_string())
        .short('l')
        .long(ConfigKey::Language.to_string())
        .env("PDFCHAT_LANGUAGE")
        .num_args(1)
        .help(format!(
            "The language code answers should be written in. [default: {}]",
            Config::default(ConfigKey::Language)
        ))
        .value_parser(PossibleValuesParser::new(Languages::codes()));
}

fn arg_upload_timeout() -> Arg {
    return Arg::new(ConfigKey::UploadTimeout.to_string())
        .long(ConfigKey::UploadTimeout.to_string())
        .env("PDFCHAT_UPLOAD_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds before an upload is abandoned. [default: {}]",
            Config::default(ConfigKey::UploadTimeout)
        ));
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("PDFCHAT_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "Path to a configuration file. [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ));
}

pub fn build() -> Command {
    return Command::new("pdfchat")
        .about("Terminal UI to chat with your PDF documents through a document question-answering service.")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(Command::new("sessions").about("Lists chat sessions stored on the server."))
        .subcommand(Command::new("languages").about("Lists the supported answer languages."))
        .arg(arg_server_url())
        .arg(arg_language())
        .arg(arg_upload_timeout())
        .arg(arg_config_file());
}

/// Returns true when the TUI should launch, false when a subcommand handled
/// the invocation entirely.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("create", _)) => {
                    create_config_file().await?;
                }
                Some(("default", _)) => {
                    println!("{}", Config::serialize_default(build()));
                }
                Some(("path", _)) => {
                    println!("{}", Config::default(ConfigKey::ConfigFile));
                }
                _ => {
                    subcommand_config().print_help()?;
                }
            }
            return Ok(false);
        }
        Some(("sessions", _)) => {
            Config::load(build(), vec![&matches]).await?;
            print_sessions_list().await?;
            return Ok(false);
        }
        Some(("languages", _)) => {
            print_languages_list();
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
