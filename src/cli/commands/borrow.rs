use super::books::{id_arg, page_arg};
use clap::{Arg, Command};

pub const CMD_BORROW: &str = "borrow";
pub const CMD_LIST: &str = "list";
pub const CMD_TAKE: &str = "take";
pub const CMD_RETURN: &str = "return";
pub const CMD_RENEW: &str = "renew";
pub const CMD_HISTORY: &str = "history";
pub const CMD_STATS: &str = "stats";

pub const ARG_STATUS: &str = "status";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD_BORROW)
        .about("Borrow, return and renew books")
        .subcommand_required(true)
        .subcommand(
            Command::new(CMD_LIST)
                .about("Current loans")
                .arg(
                    Arg::new(ARG_STATUS)
                        .long("status")
                        .help("Filter by loan status")
                        .value_parser(["borrowed", "returned", "overdue"]),
                )
                .arg(page_arg()),
        )
        .subcommand(
            Command::new(CMD_TAKE)
                .about("Borrow a book")
                .arg(id_arg("Book id")),
        )
        .subcommand(
            Command::new(CMD_RETURN)
                .about("Return a borrowed book")
                .arg(id_arg("Loan id")),
        )
        .subcommand(
            Command::new(CMD_RENEW)
                .about("Extend a loan by two weeks")
                .arg(id_arg("Loan id")),
        )
        .subcommand(
            Command::new(CMD_HISTORY)
                .about("Borrowing history")
                .arg(page_arg()),
        )
        .subcommand(Command::new(CMD_STATS).about("Loan and fine overview"))
}
