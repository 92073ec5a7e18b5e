//! Argument parsing and command dispatch.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use marquee_api_models::{
    BandDraft, BandPatch, Bands, Role, ShowDraft, ShowPatch, Shows, VenueDraft, VenuePatch, Venues,
};
use marquee_session::{ApiConfig, DEFAULT_API_URL};
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, DEFAULT_TIMEOUT_SECS, parse_api_url};
use crate::commands::{auth, resources};
use crate::telemetry::{LogFormat, LoggingConfig, init_logging};

/// Parses CLI arguments, executes the requested command and reports errors.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        format: cli.log_format,
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let command_name = command_label(&cli.command);
    let request_id = Uuid::new_v4().to_string();
    tracing::debug!(command = command_name, request_id = %request_id, "dispatching");

    let result = match AppContext::from_cli(&cli, &request_id) {
        Ok(ctx) => dispatch(cli.command, &ctx).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::debug!(command = command_name, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

pub(crate) async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::Login(args) => auth::handle_login(ctx, args).await,
        Command::Logout => auth::handle_logout(ctx),
        Command::Whoami => auth::handle_whoami(ctx).await,
        Command::Signup(args) => auth::handle_signup(ctx, args).await,
        Command::Users => auth::handle_users(ctx).await,
        Command::Shows(command) => match command {
            ShowCommand::Ls => resources::handle_list::<Shows>(ctx).await,
            ShowCommand::Get(args) => resources::handle_get::<Shows>(ctx, args.id).await,
            ShowCommand::Create(args) => resources::handle_create::<Shows>(ctx, &args.into_draft()).await,
            ShowCommand::Update(args) => {
                let id = args.id;
                resources::handle_update::<Shows>(ctx, id, &args.into_patch()?).await
            }
            ShowCommand::Delete(args) => resources::handle_delete::<Shows>(ctx, args.id).await,
        },
        Command::Bands(command) => match command {
            BandCommand::Ls => resources::handle_list::<Bands>(ctx).await,
            BandCommand::Get(args) => resources::handle_get::<Bands>(ctx, args.id).await,
            BandCommand::Create(args) => resources::handle_create::<Bands>(ctx, &args.into_draft()).await,
            BandCommand::Update(args) => {
                let id = args.id;
                resources::handle_update::<Bands>(ctx, id, &args.into_patch()?).await
            }
            BandCommand::Delete(args) => resources::handle_delete::<Bands>(ctx, args.id).await,
        },
        Command::Venues(command) => match command {
            VenueCommand::Ls => resources::handle_list::<Venues>(ctx).await,
            VenueCommand::Get(args) => resources::handle_get::<Venues>(ctx, args.id).await,
            VenueCommand::Create(args) => {
                resources::handle_create::<Venues>(ctx, &args.into_draft()).await
            }
            VenueCommand::Update(args) => {
                let id = args.id;
                resources::handle_update::<Venues>(ctx, id, &args.into_patch()?).await
            }
            VenueCommand::Delete(args) => resources::handle_delete::<Venues>(ctx, args.id).await,
        },
    }
}

#[derive(Parser)]
#[command(name = "marquee", about = "Command-line console for the Marquee live-music API")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "MARQUEE_API_URL",
        value_parser = parse_api_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: ApiConfig,
    #[arg(
        long,
        global = true,
        env = "MARQUEE_TOKEN_FILE",
        help = "File holding the bearer token [default: ~/.config/marquee/token]"
    )]
    pub(crate) token_file: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "MARQUEE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "MARQUEE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub(crate) log_format: LogFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Sign in and store the token.
    Login(LoginArgs),
    /// Forget the stored token.
    Logout,
    /// Show the signed-in account and what it may do.
    Whoami,
    /// Create an account.
    Signup(SignupArgs),
    /// List every account (admin only).
    Users,
    /// Manage shows.
    #[command(subcommand)]
    Shows(ShowCommand),
    /// Manage bands.
    #[command(subcommand)]
    Bands(BandCommand),
    /// Manage venues.
    #[command(subcommand)]
    Venues(VenueCommand),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long, short)]
    pub(crate) username: String,
    #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct SignupArgs {
    #[arg(long, short)]
    pub(crate) username: String,
    #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
    #[arg(long, value_parser = parse_role)]
    pub(crate) role: Option<Role>,
}

#[derive(Args)]
pub(crate) struct IdArgs {
    pub(crate) id: i64,
}

#[derive(Subcommand)]
pub(crate) enum ShowCommand {
    /// List shows.
    Ls,
    /// Show one show.
    Get(IdArgs),
    /// Add a show.
    Create(ShowCreateArgs),
    /// Change fields of a show.
    Update(ShowUpdateArgs),
    /// Remove a show.
    Delete(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum BandCommand {
    /// List bands.
    Ls,
    /// Show one band.
    Get(IdArgs),
    /// Add a band.
    Create(BandCreateArgs),
    /// Change fields of a band.
    Update(BandUpdateArgs),
    /// Remove a band.
    Delete(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum VenueCommand {
    /// List venues.
    Ls,
    /// Show one venue.
    Get(IdArgs),
    /// Add a venue.
    Create(VenueCreateArgs),
    /// Change fields of a venue.
    Update(VenueUpdateArgs),
    /// Remove a venue.
    Delete(IdArgs),
}

#[derive(Args)]
pub(crate) struct ShowCreateArgs {
    #[arg(long)]
    date: NaiveDate,
    #[arg(long, value_parser = parse_time, help = "Start time as HH:MM or HH:MM:SS")]
    time: NaiveTime,
    #[arg(long)]
    description: String,
    #[arg(long)]
    location: String,
    #[arg(long, value_delimiter = ',')]
    bands: Vec<String>,
    #[arg(long, default_value = "")]
    price: String,
}

impl ShowCreateArgs {
    fn into_draft(self) -> ShowDraft {
        ShowDraft {
            showdate: self.date,
            showtime: self.time,
            showdescription: self.description,
            location: self.location,
            bandsplaying: self.bands,
            ticketprice: self.price,
        }
    }
}

#[derive(Args)]
pub(crate) struct ShowUpdateArgs {
    id: i64,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_time)]
    time: Option<NaiveTime>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long, value_delimiter = ',')]
    bands: Option<Vec<String>>,
    #[arg(long)]
    price: Option<String>,
}

impl ShowUpdateArgs {
    fn into_patch(self) -> CliResult<ShowPatch> {
        let patch = ShowPatch {
            showdate: self.date,
            showtime: self.time,
            showdescription: self.description,
            location: self.location,
            bandsplaying: self.bands,
            ticketprice: self.price,
        };
        if patch.is_empty() {
            return Err(nothing_to_update());
        }
        Ok(patch)
    }
}

#[derive(Args)]
pub(crate) struct BandCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    hometown: String,
    #[arg(long, default_value = "")]
    genre: String,
    #[arg(long)]
    year_started: Option<i32>,
    #[arg(long, value_delimiter = ',')]
    members: Vec<String>,
    #[arg(long)]
    photo: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl BandCreateArgs {
    fn into_draft(self) -> BandDraft {
        BandDraft {
            bandname: self.name,
            hometown: self.hometown,
            genre: self.genre,
            yearstarted: self.year_started,
            membernames: self.members,
            bandphoto: self.photo,
            banddescription: self.description,
        }
    }
}

#[derive(Args)]
pub(crate) struct BandUpdateArgs {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    hometown: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    year_started: Option<i32>,
    #[arg(long, value_delimiter = ',')]
    members: Option<Vec<String>>,
    #[arg(long)]
    photo: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl BandUpdateArgs {
    fn into_patch(self) -> CliResult<BandPatch> {
        let patch = BandPatch {
            bandname: self.name,
            hometown: self.hometown,
            genre: self.genre,
            yearstarted: self.year_started,
            membernames: self.members,
            bandphoto: self.photo,
            banddescription: self.description,
        };
        if patch.is_empty() {
            return Err(nothing_to_update());
        }
        Ok(patch)
    }
}

#[derive(Args)]
pub(crate) struct VenueCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    capacity: i64,
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "")]
    manager: String,
}

impl VenueCreateArgs {
    fn into_draft(self) -> VenueDraft {
        VenueDraft {
            capacity: self.capacity,
            venuename: self.name,
            location: self.location,
            venuemanager: self.manager,
        }
    }
}

#[derive(Args)]
pub(crate) struct VenueUpdateArgs {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    capacity: Option<i64>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    manager: Option<String>,
}

impl VenueUpdateArgs {
    fn into_patch(self) -> CliResult<VenuePatch> {
        let patch = VenuePatch {
            capacity: self.capacity,
            venuename: self.name,
            location: self.location,
            venuemanager: self.manager,
        };
        if patch.is_empty() {
            return Err(nothing_to_update());
        }
        Ok(patch)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn nothing_to_update() -> CliError {
    CliError::validation("nothing to update; pass at least one field to change")
}

fn parse_time(input: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|_| format!("invalid time '{input}'; expected HH:MM or HH:MM:SS"))
}

fn parse_role(input: &str) -> Result<Role, String> {
    input.parse::<Role>().map_err(|err| err.to_string())
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Signup(_) => "signup",
        Command::Users => "users",
        Command::Shows(command) => match command {
            ShowCommand::Ls => "shows_ls",
            ShowCommand::Get(_) => "shows_get",
            ShowCommand::Create(_) => "shows_create",
            ShowCommand::Update(_) => "shows_update",
            ShowCommand::Delete(_) => "shows_delete",
        },
        Command::Bands(command) => match command {
            BandCommand::Ls => "bands_ls",
            BandCommand::Get(_) => "bands_get",
            BandCommand::Create(_) => "bands_create",
            BandCommand::Update(_) => "bands_update",
            BandCommand::Delete(_) => "bands_delete",
        },
        Command::Venues(command) => match command {
            VenueCommand::Ls => "venues_ls",
            VenueCommand::Get(_) => "venues_get",
            VenueCommand::Create(_) => "venues_create",
            VenueCommand::Update(_) => "venues_update",
            VenueCommand::Delete(_) => "venues_delete",
        },
    }
}
