//! Interactive session: browse the leaderboard, pick a brand, read its
//! report and unlock the presentation, all from one prompt.

use std::time::Instant;

use adscope_client::{fetch_report, load_catalog, submit_code, submit_email, AdsClient};
use adscope_core::{AppConfig, CatalogStore, Explorer, FlowError, SelectionState};
use clap::ValueEnum;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::task::JoinHandle;

use crate::brands::SortArg;
use crate::{render, report};

const HELP: &str = "\
Leaderboard:
  list                 show the current page
  search <term>        filter by name, description or category (empty clears)
  sort <option>        name-asc | name-desc | followers-desc | followers-asc | ads-desc | ads-asc
  more                 show the next page of brands
  featured [next|prev|<n>]
                       show or move the featured carousel
  select <id>          stage a brand from the list
  confirm | change     confirm the staged brand, or go back to the list
  pick <id>            open a featured brand directly
  reload               fetch the catalog again
Report:
  email <address>      request a verification code
  code <code>          submit the verification code
  contents [next|prev|<n>]
                       move the report contents carousel
  narrow on|off        show one or three contents items at a time
  back                 return to the leaderboard
  help | quit";

/// Line-oriented reader over stdin.
pub(crate) struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub(crate) fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prints `prompt` and reads one trimmed line; `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin or stdout fails.
    pub(crate) async fn ask(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }
}

/// Carousel movement requested by `featured` or `contents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    Show,
    Next,
    Prev,
    Jump(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Quit,
    List,
    Search(String),
    Sort(SortArg),
    More,
    Featured(Move),
    Select(String),
    Confirm,
    Change,
    Pick(String),
    Reload,
    Email(String),
    Code(String),
    Contents(Move),
    Narrow(bool),
    Back,
}

fn parse_move(arg: &str) -> Result<Move, String> {
    match arg {
        "" => Ok(Move::Show),
        "next" => Ok(Move::Next),
        "prev" => Ok(Move::Prev),
        n => n
            .parse()
            .map(Move::Jump)
            .map_err(|_| format!("expected next, prev or a position, got '{n}'")),
    }
}

fn required(name: &str, arg: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!("usage: {name} <value>"))
    } else {
        Ok(arg.to_string())
    }
}

/// Parses one prompt line.
///
/// # Errors
///
/// Returns a usage message for unknown commands or bad arguments.
pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, arg) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, a)| (w, a.trim()));

    match word {
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "list" | "ls" => Ok(Command::List),
        "search" => Ok(Command::Search(arg.to_string())),
        "sort" => SortArg::from_str(arg, true)
            .map(Command::Sort)
            .map_err(|_| format!("unknown sort '{arg}'; see `help`")),
        "more" => Ok(Command::More),
        "featured" => parse_move(arg).map(Command::Featured),
        "select" => required("select", arg).map(Command::Select),
        "confirm" => Ok(Command::Confirm),
        "change" => Ok(Command::Change),
        "pick" => required("pick", arg).map(Command::Pick),
        "reload" => Ok(Command::Reload),
        "email" => required("email", arg).map(Command::Email),
        "code" => required("code", arg).map(Command::Code),
        "contents" => parse_move(arg).map(Command::Contents),
        "narrow" => match arg {
            "on" => Ok(Command::Narrow(true)),
            "off" => Ok(Command::Narrow(false)),
            _ => Err("usage: narrow on|off".to_string()),
        },
        "back" => Ok(Command::Back),
        "" => Ok(Command::List),
        other => Err(format!("unknown command '{other}'; type `help`")),
    }
}

/// Run the interactive session until `quit` or end of input.
///
/// Outstanding send notifications are awaited before returning.
///
/// # Errors
///
/// Returns an error only if the terminal cannot be read or written.
pub(crate) async fn run_explore(client: &AdsClient, config: &AppConfig) -> anyhow::Result<()> {
    let mut explorer = Explorer::new(CatalogStore::new(&config.top_tier));
    if let Err(e) = load_catalog(client, explorer.catalog_mut()).await {
        tracing::debug!(error = %e, "initial catalog load failed");
    }
    print!("{}", render::featured(explorer.catalog()));
    println!();
    print!("{}", render::leaderboard(explorer.catalog()));
    println!("Type `help` for commands.");

    let mut input = Input::stdin();
    let mut notifications = Vec::new();
    loop {
        explorer.session_mut().tick(Instant::now());
        let Some(line) = input.ask("> ").await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if let Err(e) = apply(client, &mut explorer, command, &mut notifications).await {
            println!("{e}");
        }
    }

    for handle in notifications {
        if let Err(e) = handle.await {
            tracing::debug!(error = %e, "send notification task did not complete");
        }
    }
    Ok(())
}

#[allow(clippy::too_many_lines)]
async fn apply(
    client: &AdsClient,
    explorer: &mut Explorer,
    command: Command,
    notifications: &mut Vec<JoinHandle<()>>,
) -> Result<(), FlowError> {
    match command {
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
        Command::List => print!("{}", render::leaderboard(explorer.catalog())),
        Command::Search(term) => {
            explorer.catalog_mut().set_search(&term);
            print!("{}", render::leaderboard(explorer.catalog()));
        }
        Command::Sort(sort) => {
            let (key, direction) = sort.key_direction();
            explorer.catalog_mut().set_sort(key, direction);
            print!("{}", render::leaderboard(explorer.catalog()));
        }
        Command::More => {
            explorer.catalog_mut().load_more();
            print!("{}", render::leaderboard(explorer.catalog()));
        }
        Command::Featured(step) => {
            let catalog = explorer.catalog_mut();
            match step {
                Move::Show => {}
                Move::Next => catalog.next_sample(),
                Move::Prev => catalog.prev_sample(),
                Move::Jump(n) => catalog.jump_sample(n),
            }
            print!("{}", render::featured(explorer.catalog()));
        }
        Command::Reload => {
            let result = load_catalog(client, explorer.catalog_mut()).await;
            print!("{}", render::leaderboard(explorer.catalog()));
            result?;
        }
        Command::Select(id) => {
            explorer.select(&id)?;
            if let SelectionState::PendingConfirmation(brand) = explorer.selection() {
                print!("{}", render::confirmation(brand));
            }
        }
        Command::Confirm => {
            let fresh = explorer.confirm()?;
            open_report(client, explorer, fresh).await?;
        }
        Command::Change => {
            explorer.change_selection()?;
            print!("{}", render::leaderboard(explorer.catalog()));
        }
        Command::Pick(id) => {
            let fresh = explorer.select_sample(&id)?;
            open_report(client, explorer, fresh).await?;
        }
        Command::Email(email) => {
            let before = explorer.session().gate().feedback().cloned();
            let result = submit_email(client, explorer.session_mut(), &email).await;
            print!("{}", render::access(explorer.session().gate()));
            unposted(result, before.as_ref(), explorer)?;
        }
        Command::Code(code) => {
            let before = explorer.session().gate().feedback().cloned();
            match submit_code(client, explorer.session_mut(), &code).await {
                Ok(verified) => {
                    let name = explorer
                        .session()
                        .active()
                        .map_or_else(String::new, |b| b.name.clone());
                    print!("{}", render::access(explorer.session().gate()));
                    print!("{}", render::viewer(&name, Some(&verified.viewer_url)));
                    notifications.push(verified.notification);
                }
                Err(e) => {
                    print!("{}", render::access(explorer.session().gate()));
                    unposted(Err(e), before.as_ref(), explorer)?;
                }
            }
        }
        Command::Contents(step) => {
            let session = explorer.session_mut();
            match step {
                Move::Show => {}
                Move::Next => session.next_content(),
                Move::Prev => session.prev_content(),
                Move::Jump(n) => session.jump_content(n),
            }
            print!("{}", render::contents(explorer.session().contents()));
        }
        Command::Narrow(narrow) => {
            explorer.session_mut().set_narrow(narrow);
            print!("{}", render::contents(explorer.session().contents()));
        }
        Command::Back => {
            explorer.back_to_selection();
            print!("{}", render::leaderboard(explorer.catalog()));
        }
    }
    Ok(())
}

/// Passes on an error only if the gate did not already post it as
/// feedback, so nothing is printed twice.
fn unposted(
    result: Result<(), FlowError>,
    before: Option<&adscope_core::Feedback>,
    explorer: &Explorer,
) -> Result<(), FlowError> {
    match result {
        Err(e) if explorer.session().gate().feedback() == before => Err(e),
        _ => Ok(()),
    }
}

/// Shows the report screen, fetching it first when the selection changed.
async fn open_report(
    client: &AdsClient,
    explorer: &mut Explorer,
    fresh: bool,
) -> Result<(), FlowError> {
    let fetched = if fresh {
        fetch_report(client, explorer.session_mut()).await
    } else {
        Ok(())
    };
    report::show_report(explorer.session(), fresh).await;
    println!();
    print!("{}", render::access(explorer.session().gate()));
    match fetched {
        // Already shown in the report header.
        Err(
            FlowError::NetworkFailure(_)
            | FlowError::MalformedResponse(_)
            | FlowError::MissingPrecondition(_),
        ) => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse_command("search  liquid death "),
            Ok(Command::Search("liquid death".to_string()))
        );
        assert_eq!(
            parse_command("sort followers-asc"),
            Ok(Command::Sort(SortArg::FollowersAsc))
        );
        assert_eq!(
            parse_command("email me@example.com"),
            Ok(Command::Email("me@example.com".to_string()))
        );
        assert_eq!(parse_command("narrow on"), Ok(Command::Narrow(true)));
    }

    #[test]
    fn empty_search_clears_the_filter() {
        assert_eq!(parse_command("search"), Ok(Command::Search(String::new())));
    }

    #[test]
    fn parses_carousel_moves() {
        assert_eq!(parse_command("featured"), Ok(Command::Featured(Move::Show)));
        assert_eq!(parse_command("featured next"), Ok(Command::Featured(Move::Next)));
        assert_eq!(parse_command("contents 4"), Ok(Command::Contents(Move::Jump(4))));
        assert!(parse_command("contents sideways").is_err());
    }

    #[test]
    fn rejects_missing_arguments_and_unknown_words() {
        assert!(parse_command("select").is_err());
        assert!(parse_command("code").is_err());
        assert!(parse_command("sort popularity").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn blank_line_redraws_the_list() {
        assert_eq!(parse_command("   "), Ok(Command::List));
    }
}
