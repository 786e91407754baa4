//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to global settings and the action to run.

use crate::cli::{
    actions::{admin, auth, books, borrow, Action},
    commands::{
        self, admin as admin_cmd, auth as auth_cmd, books as books_cmd, borrow as borrow_cmd,
    },
    globals::{default_session_file, GlobalArgs},
};
use crate::library::{BookInput, BookQuery, BorrowStatus, RegistrationAction};
use crate::session::Registration;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Settings shared by every subcommand.
/// # Errors
/// Returns an error if the API URL does not parse.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(commands::ARG_API_URL)
        .map_or(commands::DEFAULT_API_URL, String::as_str);
    let api_url = Url::parse(api_url).with_context(|| format!("invalid --api-url: {api_url}"))?;

    let session_file = matches
        .get_one::<String>(commands::ARG_SESSION_FILE)
        .map_or_else(default_session_file, PathBuf::from);

    let timeout = matches
        .get_one::<u64>(commands::ARG_TIMEOUT)
        .copied()
        .unwrap_or(10);

    Ok(GlobalArgs::new(
        api_url,
        session_file,
        Duration::from_secs(timeout),
    ))
}

/// Map validated CLI matches to an action.
/// # Errors
/// Returns an error if a required argument is missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((auth_cmd::CMD_LOGIN, sub)) => Ok(Action::Auth(auth::Command::Login {
            username: required(sub, auth_cmd::ARG_USERNAME)?,
            password: SecretString::from(required(sub, auth_cmd::ARG_PASSWORD)?),
            admin: sub.get_flag(auth_cmd::ARG_ADMIN),
        })),
        Some((auth_cmd::CMD_REGISTER, sub)) => {
            Ok(Action::Auth(auth::Command::Register(Registration {
                username: required(sub, auth_cmd::ARG_USERNAME)?,
                email: required(sub, auth_cmd::ARG_EMAIL)?,
                password: SecretString::from(required(sub, auth_cmd::ARG_PASSWORD)?),
                full_name: required(sub, auth_cmd::ARG_FULL_NAME)?,
                department: optional(sub, auth_cmd::ARG_DEPARTMENT).unwrap_or_default(),
                roll_number: optional(sub, auth_cmd::ARG_ROLL_NUMBER),
            })))
        }
        Some((auth_cmd::CMD_LOGOUT, _)) => Ok(Action::Auth(auth::Command::Logout)),
        Some((auth_cmd::CMD_WHOAMI, _)) => Ok(Action::Auth(auth::Command::Whoami)),
        Some((books_cmd::CMD_BOOKS, sub)) => books_action(sub).map(Action::Books),
        Some((borrow_cmd::CMD_BORROW, sub)) => borrow_action(sub).map(Action::Borrow),
        Some((admin_cmd::CMD_ADMIN, sub)) => admin_action(sub).map(Action::Admin),
        _ => Err(anyhow!("missing subcommand, see `libris --help`")),
    }
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    optional(matches, name).with_context(|| format!("missing required argument: {name}"))
}

fn optional(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn id(matches: &ArgMatches) -> Result<u64> {
    matches
        .get_one::<u64>(books_cmd::ARG_ID)
        .copied()
        .context("missing required argument: id")
}

fn page(matches: &ArgMatches) -> Option<u32> {
    matches.get_one::<u32>(books_cmd::ARG_PAGE).copied()
}

fn book_input(matches: &ArgMatches) -> BookInput {
    BookInput {
        title: optional(matches, books_cmd::ARG_TITLE),
        description: optional(matches, books_cmd::ARG_DESCRIPTION),
        category: optional(matches, books_cmd::ARG_CATEGORY),
        author: optional(matches, books_cmd::ARG_AUTHOR),
        isbn: optional(matches, books_cmd::ARG_ISBN),
        thumbnail: optional(matches, books_cmd::ARG_THUMBNAIL),
        num_pages: matches.get_one::<u32>(books_cmd::ARG_PAGES).copied(),
        average_rating: matches.get_one::<f64>(books_cmd::ARG_RATING).copied(),
        published_year: optional(matches, books_cmd::ARG_YEAR),
        available_copies: matches.get_one::<i64>(books_cmd::ARG_COPIES).copied(),
    }
}

fn books_action(matches: &ArgMatches) -> Result<books::Command> {
    match matches.subcommand() {
        Some((books_cmd::CMD_LIST, sub)) => Ok(books::Command::List(BookQuery {
            search: optional(sub, books_cmd::ARG_SEARCH),
            category: optional(sub, books_cmd::ARG_CATEGORY),
            ordering: optional(sub, books_cmd::ARG_ORDERING),
            page: page(sub),
            page_size: sub.get_one::<u32>(books_cmd::ARG_PAGE_SIZE).copied(),
        })),
        Some((books_cmd::CMD_SHOW, sub)) => Ok(books::Command::Show(id(sub)?)),
        Some((books_cmd::CMD_SEARCH, sub)) => Ok(books::Command::Search(required(
            sub,
            books_cmd::ARG_QUERY,
        )?)),
        Some((books_cmd::CMD_CATEGORIES, _)) => Ok(books::Command::Categories),
        Some((books_cmd::CMD_ADD, sub)) => Ok(books::Command::Add(book_input(sub))),
        Some((books_cmd::CMD_UPDATE, sub)) => Ok(books::Command::Update {
            id: id(sub)?,
            input: book_input(sub),
        }),
        Some((books_cmd::CMD_DELETE, sub)) => Ok(books::Command::Delete(id(sub)?)),
        Some((books_cmd::CMD_BULK_UPLOAD, sub)) => Ok(books::Command::BulkUpload(
            PathBuf::from(required(sub, books_cmd::ARG_FILE)?),
        )),
        _ => Err(anyhow!("missing subcommand, see `libris books --help`")),
    }
}

fn borrow_action(matches: &ArgMatches) -> Result<borrow::Command> {
    match matches.subcommand() {
        Some((borrow_cmd::CMD_LIST, sub)) => {
            let status = match optional(sub, borrow_cmd::ARG_STATUS).as_deref() {
                Some("borrowed") => Some(BorrowStatus::Borrowed),
                Some("returned") => Some(BorrowStatus::Returned),
                Some("overdue") => Some(BorrowStatus::Overdue),
                Some(other) => return Err(anyhow!("unknown loan status: {other}")),
                None => None,
            };
            Ok(borrow::Command::List {
                status,
                page: page(sub),
            })
        }
        Some((borrow_cmd::CMD_TAKE, sub)) => Ok(borrow::Command::Take(id(sub)?)),
        Some((borrow_cmd::CMD_RETURN, sub)) => Ok(borrow::Command::Return(id(sub)?)),
        Some((borrow_cmd::CMD_RENEW, sub)) => Ok(borrow::Command::Renew(id(sub)?)),
        Some((borrow_cmd::CMD_HISTORY, sub)) => Ok(borrow::Command::History { page: page(sub) }),
        Some((borrow_cmd::CMD_STATS, _)) => Ok(borrow::Command::Stats),
        _ => Err(anyhow!("missing subcommand, see `libris borrow --help`")),
    }
}

fn admin_action(matches: &ArgMatches) -> Result<admin::Command> {
    match matches.subcommand() {
        Some((admin_cmd::CMD_REGISTRATIONS, sub)) => {
            Ok(admin::Command::Registrations { page: page(sub) })
        }
        Some((admin_cmd::CMD_APPROVE, sub)) => Ok(admin::Command::Review {
            id: id(sub)?,
            action: RegistrationAction::Approve,
        }),
        Some((admin_cmd::CMD_REJECT, sub)) => Ok(admin::Command::Review {
            id: id(sub)?,
            action: RegistrationAction::Reject {
                reason: optional(sub, admin_cmd::ARG_REASON),
            },
        }),
        Some((admin_cmd::CMD_DUES, sub)) => Ok(admin::Command::Dues {
            min_due: sub.get_one::<f64>(admin_cmd::ARG_MIN_DUE).copied(),
            page: page(sub),
        }),
        Some((admin_cmd::CMD_STATS, _)) => Ok(admin::Command::Stats),
        _ => Err(anyhow!("missing subcommand, see `libris admin --help`")),
    }
}
