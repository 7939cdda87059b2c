//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry
//! point.

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::cdp::Browser;
use crate::config::{ClearRequest, Config, CopyRequest, LoginRequest, Selectors, DEFAULT_ENDPOINT};
use crate::cookies::CdpCookieStore;
use crate::error::{CookieportError, Result};
use crate::exit_code::exit_code_for_error;
use crate::ops;
use crate::ops::CdpTabDriver;
use crate::output::OutputWriter;

/// Main entry point for the CLI application
pub fn run() {
    crate::logging::init();

    let app = create_app();
    let matches = app.get_matches();

    match run_with_args(&matches) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("cookieport: error: {}", e);
            std::process::exit(exit_code_for_error(&e));
        }
    }
}

/// Run cookieport with parsed command line arguments
fn run_with_args(matches: &ArgMatches) -> Result<()> {
    let config = build_config_from_args(matches);

    let rt = tokio::runtime::Runtime::new().map_err(CookieportError::Io)?;
    rt.block_on(dispatch(matches, &config))
}

async fn dispatch(matches: &ArgMatches, config: &Config) -> Result<()> {
    let writer = OutputWriter::new(config.output.clone());

    match matches.subcommand() {
        Some(("copy", sub)) => {
            let request = copy_request_from_args(sub)?;
            ops::copy::validate_request(&request)?;

            writer.write_verbose(&format!("connecting to {}", config.endpoint));
            let browser = Browser::connect(&config.endpoint).await?;
            let store = CdpCookieStore::new(browser.page_session().await?);
            let summary = ops::copy_cookies(&store, &request).await?;
            writer.render_copy(&summary)
        }
        Some(("clear", sub)) => {
            let request = ClearRequest {
                url: sub
                    .get_one::<String>("url")
                    .cloned()
                    .unwrap_or_default(),
            };
            crate::utils::UrlUtils::require_http_url(&request.url, "URL")?;

            writer.write_verbose(&format!("connecting to {}", config.endpoint));
            let browser = Browser::connect(&config.endpoint).await?;
            let store = CdpCookieStore::new(browser.page_session().await?);
            let summary = ops::clear_cookies(&store, &request).await?;
            writer.render_clear(&summary)
        }
        Some(("login", sub)) => {
            let request = login_request_from_args(sub);
            ops::login::validate_request(&request)?;
            let chained = chained_copy_from_args(sub)?;

            writer.write_verbose(&format!("connecting to {}", config.endpoint));
            let browser = Browser::connect(&config.endpoint).await?;

            let mut driver = CdpTabDriver::new(&browser, config.poll.load_timeout);
            let outcome = ops::automate_login(&mut driver, &request, &config.poll).await?;
            writer.render_login(&outcome)?;

            if let Some(copy_request) = chained {
                writer.write_verbose("login succeeded, copying cookies");
                let store = CdpCookieStore::new(browser.page_session().await?);
                let summary = ops::copy_with_retry(&config.retry, || {
                    ops::copy_cookies(&store, &copy_request)
                })
                .await?;
                writer.render_copy(&summary)?;
            }
            Ok(())
        }
        _ => unreachable!("subcommand is required"),
    }
}

/// Create the CLI application structure
fn create_app() -> Command {
    Command::new("cookieport")
        .version(crate::VERSION)
        .about("Copy, clear, and bootstrap browser session cookies across origins")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("URL")
                .help("Remote debugging endpoint of the browser")
                .env("COOKIEPORT_ENDPOINT")
                .default_value(DEFAULT_ENDPOINT)
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print summaries as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Silent mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("copy")
                .about("Copy cookies from one origin to another")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("URL")
                        .help("Source URL")
                        .required(true),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("URL")
                        .help("Destination URL")
                        .required(true),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Copy every cookie instead of an explicit key list")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("keys")
                        .long("keys")
                        .value_name("NAMES")
                        .help("Comma-separated cookie names to copy")
                        .default_value(""),
                ),
        )
        .subcommand(
            Command::new("clear")
                .about("Remove every cookie held for a site")
                .arg(
                    Arg::new("url")
                        .help("The URL whose origin is cleared")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Automate a login form to establish a session")
                .arg(
                    Arg::new("url")
                        .help("The login page URL")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .value_name("USER")
                        .help("Username to fill")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .value_name("PASSWORD")
                        .help("Password to fill")
                        .required(true),
                )
                .arg(
                    Arg::new("username-field")
                        .long("username-field")
                        .value_name("SELECTOR")
                        .help("Selector of the username field (#id or .class)")
                        .required(true),
                )
                .arg(
                    Arg::new("password-field")
                        .long("password-field")
                        .value_name("SELECTOR")
                        .help("Selector of the password field (#id or .class)")
                        .required(true),
                )
                .arg(
                    Arg::new("submit")
                        .long("submit")
                        .value_name("SELECTOR")
                        .help("Selector of the submit control (#id or .class)")
                        .required(true),
                )
                .arg(
                    Arg::new("then-copy")
                        .long("then-copy")
                        .help("Copy cookies after the login succeeds")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("URL")
                        .help("Source URL for the chained copy")
                        .requires("then-copy"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("URL")
                        .help("Destination URL for the chained copy")
                        .requires("then-copy"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Chained copy takes every cookie")
                        .action(ArgAction::SetTrue)
                        .requires("then-copy"),
                )
                .arg(
                    Arg::new("keys")
                        .long("keys")
                        .value_name("NAMES")
                        .help("Comma-separated cookie names for the chained copy")
                        .default_value("")
                        .requires("then-copy"),
                ),
        )
}

/// Build configuration from command line arguments
fn build_config_from_args(matches: &ArgMatches) -> Config {
    let mut config = Config::default();

    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        config.endpoint = endpoint.clone();
    }
    config.output.format_json = matches.get_flag("json");
    config.output.verbose = matches.get_flag("verbose");
    config.output.silent = matches.get_flag("silent");

    config
}

fn copy_request_from_args(matches: &ArgMatches) -> Result<CopyRequest> {
    Ok(CopyRequest {
        source_url: matches
            .get_one::<String>("from")
            .cloned()
            .unwrap_or_default(),
        destination_url: matches.get_one::<String>("to").cloned().unwrap_or_default(),
        copy_all: matches.get_flag("all"),
        keys: matches
            .get_one::<String>("keys")
            .cloned()
            .unwrap_or_default(),
    })
}

fn login_request_from_args(matches: &ArgMatches) -> LoginRequest {
    LoginRequest {
        url: matches.get_one::<String>("url").cloned().unwrap_or_default(),
        username: matches
            .get_one::<String>("username")
            .cloned()
            .unwrap_or_default(),
        password: matches
            .get_one::<String>("password")
            .cloned()
            .unwrap_or_default(),
        selectors: Selectors {
            username: matches
                .get_one::<String>("username-field")
                .cloned()
                .unwrap_or_default(),
            password: matches
                .get_one::<String>("password-field")
                .cloned()
                .unwrap_or_default(),
            submit: matches
                .get_one::<String>("submit")
                .cloned()
                .unwrap_or_default(),
        },
    }
}

/// The chained copy is configured on the login subcommand; it runs only
/// when `--then-copy` is set, and both URLs must validate before any tab
/// is opened.
fn chained_copy_from_args(matches: &ArgMatches) -> Result<Option<CopyRequest>> {
    if !matches.get_flag("then-copy") {
        return Ok(None);
    }
    let request = copy_request_from_args(matches)?;
    ops::copy::validate_request(&request)?;
    Ok(Some(request))
}
