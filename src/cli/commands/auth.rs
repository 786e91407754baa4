use clap::{Arg, ArgAction, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_ADMIN: &str = "admin";
pub const ARG_EMAIL: &str = "email";
pub const ARG_FULL_NAME: &str = "full-name";
pub const ARG_DEPARTMENT: &str = "department";
pub const ARG_ROLL_NUMBER: &str = "roll-number";

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long("password")
        .help("Account password")
        .env("LIBRIS_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new(CMD_LOGIN)
            .about("Sign in and store the session")
            .arg(
                Arg::new(ARG_USERNAME)
                    .help("Username")
                    .required(true),
            )
            .arg(password_arg())
            .arg(
                Arg::new(ARG_ADMIN)
                    .long("admin")
                    .help("Sign in as an administrator")
                    .action(ArgAction::SetTrue),
            ),
        Command::new(CMD_REGISTER)
            .about("Request a student account")
            .arg(
                Arg::new(ARG_USERNAME)
                    .long("username")
                    .help("Username")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_EMAIL)
                    .long("email")
                    .help("College email address")
                    .required(true),
            )
            .arg(password_arg())
            .arg(
                Arg::new(ARG_FULL_NAME)
                    .long("full-name")
                    .help("Full name")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_DEPARTMENT)
                    .long("department")
                    .help("Department")
                    .default_value(""),
            )
            .arg(
                Arg::new(ARG_ROLL_NUMBER)
                    .long("roll-number")
                    .help("Student roll number"),
            ),
        Command::new(CMD_LOGOUT).about("Sign out and forget the stored session"),
        Command::new(CMD_WHOAMI).about("Show the signed-in user"),
    ]
}
