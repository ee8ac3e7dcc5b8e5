use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mod_warden_lib::commands;
use mod_warden_lib::config::AppSettings;
use mod_warden_lib::models::profile::ProfileUpdate;
use mod_warden_lib::utils::logging;
use mod_warden_lib::{SError, Session};
use serde::Serialize;
use std::collections::BTreeSet;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "mod-warden",
    version,
    about = "Discover game mods and switch them between profiles"
)]
struct Cli {
    /// Game installation root, instead of the configured or detected one
    #[arg(long, global = true)]
    install: Option<Utf8PathBuf>,

    /// Folder for the disabled mirror, deleted backups, profiles and logs
    #[arg(long, global = true)]
    data_dir: Option<Utf8PathBuf>,

    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every mod with its resolved state
    Scan {
        #[arg(long)]
        world: Option<String>,
    },
    /// Show the resolved folders
    Locations,
    /// List save folders, most recently played first
    Worlds,
    /// Set one mod's Enabled flag in a world config
    SetEnabled {
        world: String,
        mod_id: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Move mods on disk so they match a profile
    Apply {
        profile_id: String,
        #[arg(long)]
        world: Option<String>,
    },
    /// Back up a mod and remove it
    Delete { mod_id: String, path: Utf8PathBuf },
    #[command(subcommand)]
    Deleted(DeletedCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Store the install folder or the world used when none is given
    Settings {
        #[arg(long)]
        install_path: Option<Utf8PathBuf>,
        #[arg(long)]
        select_world: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum DeletedCommand {
    List,
    Restore { backup_id: String },
    Purge { backup_id: String },
    Clear,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    List,
    Create {
        name: String,
        #[arg(long = "mod")]
        mods: Vec<String>,
    },
    Update {
        profile_id: String,
        #[arg(long)]
        name: Option<String>,
        /// Replaces the enabled set when given at least once
        #[arg(long = "mod")]
        mods: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete { profile_id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = AppSettings::load().unwrap_or_else(|e| {
        eprintln!("settings unreadable, using defaults: {e}");
        AppSettings::default()
    });
    if cli.install.is_some() {
        settings.install_path_override = cli.install.clone();
    }
    if cli.data_dir.is_some() {
        settings.data_dir_override = cli.data_dir.clone();
    }

    let log_dir = settings.data_paths().ok().map(|paths| paths.logs);
    let _guard = logging::init(log_dir.as_deref(), cli.verbose);

    match run(settings, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: AppSettings, command: Command) -> Result<(), SError> {
    if let Command::Settings {
        install_path,
        select_world,
    } = command
    {
        return store_settings(install_path, select_world);
    }

    let session = Session::new(settings)?;

    match command {
        Command::Scan { world } => print(&commands::scan(&session, world.as_deref())?),
        Command::Locations => print(&commands::resolve_locations(&session)?),
        Command::Worlds => print(&commands::list_worlds(&session)?),
        Command::SetEnabled {
            world,
            mod_id,
            enabled,
        } => print(&commands::set_mod_enabled(&session, &world, &mod_id, enabled)?),
        Command::Apply { profile_id, world } => print(&commands::apply_profile(
            &session,
            &profile_id,
            world.as_deref(),
        )?),
        Command::Delete { mod_id, path } => {
            print(&commands::delete_mod(&session, &mod_id, &path)?)
        }
        Command::Deleted(cmd) => match cmd {
            DeletedCommand::List => print(&commands::list_deleted_mods(&session)?),
            DeletedCommand::Restore { backup_id } => {
                print(&commands::restore_deleted_mod(&session, &backup_id)?)
            }
            DeletedCommand::Purge { backup_id } => {
                print(&commands::permanently_delete_mod(&session, &backup_id)?)
            }
            DeletedCommand::Clear => print(&commands::clear_deleted_mods(&session)?),
        },
        Command::Profile(cmd) => match cmd {
            ProfileCommand::List => print(&commands::list_profiles(&session)?),
            ProfileCommand::Create { name, mods } => print(&commands::create_profile(
                &session,
                &name,
                mods.into_iter().collect(),
            )?),
            ProfileCommand::Update {
                profile_id,
                name,
                mods,
                notes,
            } => {
                let enabled_mods =
                    (!mods.is_empty()).then(|| mods.into_iter().collect::<BTreeSet<_>>());
                let changes = ProfileUpdate {
                    name,
                    enabled_mods,
                    load_order: None,
                    notes,
                };
                print(&commands::update_profile(&session, &profile_id, changes)?)
            }
            ProfileCommand::Delete { profile_id } => {
                print(&commands::delete_profile(&session, &profile_id)?)
            }
        },
        Command::Settings { .. } => Ok(()),
    }
}

/// Persists changes to the stored settings, ignoring command-line overrides.
fn store_settings(
    install_path: Option<Utf8PathBuf>,
    select_world: Option<String>,
) -> Result<(), SError> {
    let mut stored = AppSettings::load()?;
    if let Some(path) = install_path {
        stored.install_path_override = Some(path).filter(|p| !p.as_str().is_empty());
    }
    if let Some(world) = select_world {
        stored.selected_world_id = Some(world).filter(|w| !w.is_empty());
    }
    stored.save()?;
    print(&stored)
}

fn print<T: Serialize>(value: &T) -> Result<(), SError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
