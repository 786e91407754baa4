use super::books::{id_arg, page_arg};
use clap::{Arg, Command};

pub const CMD_ADMIN: &str = "admin";
pub const CMD_REGISTRATIONS: &str = "registrations";
pub const CMD_APPROVE: &str = "approve";
pub const CMD_REJECT: &str = "reject";
pub const CMD_DUES: &str = "dues";
pub const CMD_STATS: &str = "stats";

pub const ARG_REASON: &str = "reason";
pub const ARG_MIN_DUE: &str = "min-due";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD_ADMIN)
        .about("Library administration")
        .subcommand_required(true)
        .subcommand(
            Command::new(CMD_REGISTRATIONS)
                .about("Pending student registrations")
                .arg(page_arg()),
        )
        .subcommand(
            Command::new(CMD_APPROVE)
                .about("Approve a registration")
                .arg(id_arg("Registration id")),
        )
        .subcommand(
            Command::new(CMD_REJECT)
                .about("Reject a registration and delete the account")
                .arg(id_arg("Registration id"))
                .arg(Arg::new(ARG_REASON).long("reason").help("Reason for rejection")),
        )
        .subcommand(
            Command::new(CMD_DUES)
                .about("Students with outstanding fines")
                .arg(
                    Arg::new(ARG_MIN_DUE)
                        .long("min-due")
                        .help("Only students owing at least this amount")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(page_arg()),
        )
        .subcommand(Command::new(CMD_STATS).about("Dashboard statistics"))
}
