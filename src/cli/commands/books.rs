use clap::{Arg, Command};

pub const CMD_BOOKS: &str = "books";
pub const CMD_LIST: &str = "list";
pub const CMD_SHOW: &str = "show";
pub const CMD_SEARCH: &str = "search";
pub const CMD_CATEGORIES: &str = "categories";
pub const CMD_ADD: &str = "add";
pub const CMD_UPDATE: &str = "update";
pub const CMD_DELETE: &str = "delete";
pub const CMD_BULK_UPLOAD: &str = "bulk-upload";

pub const ARG_ID: &str = "id";
pub const ARG_QUERY: &str = "query";
pub const ARG_SEARCH: &str = "search";
pub const ARG_CATEGORY: &str = "category";
pub const ARG_ORDERING: &str = "ordering";
pub const ARG_PAGE: &str = "page";
pub const ARG_PAGE_SIZE: &str = "page-size";
pub const ARG_FILE: &str = "file";

pub const ARG_TITLE: &str = "title";
pub const ARG_AUTHOR: &str = "author";
pub const ARG_ISBN: &str = "isbn";
pub const ARG_DESCRIPTION: &str = "description";
pub const ARG_THUMBNAIL: &str = "thumbnail";
pub const ARG_PAGES: &str = "pages";
pub const ARG_RATING: &str = "rating";
pub const ARG_YEAR: &str = "year";
pub const ARG_COPIES: &str = "copies";

const ORDERINGS: [&str; 8] = [
    "id",
    "-id",
    "title",
    "-title",
    "published_year",
    "-published_year",
    "average_rating",
    "-average_rating",
];

pub(crate) fn id_arg(help: &'static str) -> Arg {
    Arg::new(ARG_ID)
        .help(help)
        .required(true)
        .value_parser(clap::value_parser!(u64))
}

pub(crate) fn page_arg() -> Arg {
    Arg::new(ARG_PAGE)
        .long("page")
        .help("Page number")
        .value_parser(clap::value_parser!(u32).range(1..))
}

/// Book fields shared by `add` and `update`. `required` marks the ones `add` needs.
fn book_args(command: Command, required: bool) -> Command {
    command
        .arg(
            Arg::new(ARG_TITLE)
                .long("title")
                .help("Title")
                .required(required),
        )
        .arg(
            Arg::new(ARG_AUTHOR)
                .long("author")
                .help("Author")
                .required(required),
        )
        .arg(
            Arg::new(ARG_ISBN)
                .long("isbn")
                .help("ISBN (unique)")
                .required(required),
        )
        .arg(
            Arg::new(ARG_CATEGORY)
                .long("category")
                .help("Category")
                .required(required),
        )
        .arg(Arg::new(ARG_DESCRIPTION).long("description").help("Description"))
        .arg(Arg::new(ARG_THUMBNAIL).long("thumbnail").help("Cover image URL"))
        .arg(
            Arg::new(ARG_PAGES)
                .long("pages")
                .help("Number of pages")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_RATING)
                .long("rating")
                .help("Average rating")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(Arg::new(ARG_YEAR).long("year").help("Year of publication"))
        .arg(
            Arg::new(ARG_COPIES)
                .long("copies")
                .help("Available copies")
                .value_parser(clap::value_parser!(i64).range(0..)),
        )
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD_BOOKS)
        .about("Browse and manage the catalog")
        .subcommand_required(true)
        .subcommand(
            Command::new(CMD_LIST)
                .about("List books")
                .arg(Arg::new(ARG_SEARCH).long("search").help("Match title, author, category or ISBN"))
                .arg(Arg::new(ARG_CATEGORY).long("category").help("Exact category"))
                .arg(
                    Arg::new(ARG_ORDERING)
                        .long("ordering")
                        .help("Sort order")
                        .value_parser(ORDERINGS),
                )
                .arg(page_arg())
                .arg(
                    Arg::new(ARG_PAGE_SIZE)
                        .long("page-size")
                        .help("Results per page (max 100)")
                        .value_parser(clap::value_parser!(u32).range(1..=100)),
                ),
        )
        .subcommand(
            Command::new(CMD_SHOW)
                .about("Show one book")
                .arg(id_arg("Book id")),
        )
        .subcommand(
            Command::new(CMD_SEARCH)
                .about("Search the catalog")
                .arg(Arg::new(ARG_QUERY).help("Search text").required(true)),
        )
        .subcommand(Command::new(CMD_CATEGORIES).about("List categories"))
        .subcommand(book_args(Command::new(CMD_ADD).about("Add a book"), true))
        .subcommand(book_args(
            Command::new(CMD_UPDATE)
                .about("Update a book")
                .arg(id_arg("Book id")),
            false,
        ))
        .subcommand(
            Command::new(CMD_DELETE)
                .about("Delete a book")
                .arg(id_arg("Book id")),
        )
        .subcommand(
            Command::new(CMD_BULK_UPLOAD)
                .about("Add books from a JSON array file")
                .arg(Arg::new(ARG_FILE).help("Path to the JSON file").required(true)),
        )
}
