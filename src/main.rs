use clap::{Parser, Subcommand};
use quadframe::imaging::{Adjustment, OutputSize};
use quadframe::payload::SwapPayload;
use quadframe::session::Workspace;
use quadframe::slot::SlotId;
use quadframe::{config, export, output};
use std::io::Read;
use std::path::PathBuf;

fn parse_slot(s: &str) -> Result<SlotId, String> {
    let index: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a slot number"))?;
    SlotId::new(index).map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "quadframe")]
#[command(about = "Compose four images into a 2x2 grid")]
#[command(long_about = "\
Compose four images into a 2x2 grid

Four slots, numbered in grid order:

  ┌─────────┬─────────┐
  │ slot 0  │ slot 1  │
  ├─────────┼─────────┤
  │ slot 2  │ slot 3  │
  └─────────┴─────────┘

Every image is center-cropped to 16:9 when it enters a slot. Each slot has
its own exposure, shadow and highlight adjustment (-50 to 50). Dropping one
slot on another swaps their image, source and adjustment.

Slot contents are kept in a session file between commands, so a typical run
looks like:

  quadframe load 0 dawn.jpg
  quadframe paste 1 < clipboard.png
  quadframe adjust 0 --exposure 20 --shadow -30
  quadframe swap 0 3
  quadframe export --uhd

Run 'quadframe gen-config' to generate a documented quadframe.toml.")]
#[command(version)]
struct Cli {
    /// Session file holding slot sources and adjustments
    #[arg(long, default_value = ".quadframe/session.json", global = true)]
    session: PathBuf,

    /// Directory for pasted images and previews
    #[arg(long, default_value = ".quadframe", global = true)]
    temp_dir: PathBuf,

    /// Directory containing quadframe.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load an image file into a slot
    Load {
        #[arg(value_parser = parse_slot)]
        slot: SlotId,
        path: PathBuf,
    },
    /// Load image bytes from stdin into a slot
    Paste {
        #[arg(value_parser = parse_slot)]
        slot: SlotId,
    },
    /// Change a slot's tone adjustment; omitted values are kept
    Adjust {
        #[arg(value_parser = parse_slot)]
        slot: SlotId,
        #[arg(long, allow_negative_numbers = true)]
        exposure: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        shadow: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        highlight: Option<i32>,
    },
    /// Drop slot FROM onto slot TO, exchanging their contents
    Swap {
        from: usize,
        #[arg(value_parser = parse_slot)]
        to: SlotId,
    },
    /// Drop a `slot|source|exposure|shadow|highlight` payload onto a slot
    Drop {
        #[arg(value_parser = parse_slot)]
        to: SlotId,
        payload: SwapPayload,
    },
    /// Empty one slot, or all of them
    Clear {
        #[arg(value_parser = parse_slot)]
        slot: Option<SlotId>,
    },
    /// List slot contents
    Show,
    /// Write a PNG preview of the grid
    Preview {
        /// Preview file (default: <temp-dir>/preview.png)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write the grid as JPEG, named after the slot sources
    Export {
        /// Output size as WIDTHxHEIGHT
        #[arg(long, default_value_t = OutputSize::FULL_HD, conflicts_with = "uhd")]
        size: OutputSize,
        /// Shorthand for --size 3840x2160
        #[arg(long)]
        uhd: bool,
        /// Output directory (default: export.output_dir from config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print a stock quadframe.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.config_dir)?;
    let mut workspace = Workspace::open(&cli.session, config.aspect())?;

    let modified = match cli.command {
        Command::Load { slot, path } => {
            workspace.load_file(slot, &path)?;
            output::print_slot_update(workspace.store().slot(slot));
            true
        }
        Command::Paste { slot } => {
            let mut raw = Vec::new();
            std::io::stdin().lock().read_to_end(&mut raw)?;
            let path = workspace.paste(slot, &raw, &cli.temp_dir)?;
            log::info!("pasted image stored as {}", path.display());
            output::print_slot_update(workspace.store().slot(slot));
            true
        }
        Command::Adjust {
            slot,
            exposure,
            shadow,
            highlight,
        } => {
            let current = workspace.store().slot(slot).adjustment();
            let adjustment = Adjustment {
                exposure: exposure.unwrap_or(current.exposure),
                shadow: shadow.unwrap_or(current.shadow),
                highlight: highlight.unwrap_or(current.highlight),
            };
            workspace.set_adjustment(slot, adjustment)?;
            output::print_slot_update(workspace.store().slot(slot));
            true
        }
        Command::Swap { from, to } => {
            workspace.swap(to, from)?;
            output::print_swap(to, SlotId::new(from)?);
            true
        }
        Command::Drop { to, payload } => {
            workspace.drop_payload(to, &payload)?;
            output::print_swap(to, SlotId::new(payload.source_slot)?);
            true
        }
        Command::Clear { slot } => {
            match slot {
                Some(slot) => workspace.clear(slot),
                None => workspace.clear_all(),
            }
            output::print_slots(workspace.store());
            true
        }
        Command::Show => {
            output::print_slots(workspace.store());
            false
        }
        Command::Preview {
            output: preview_path,
        } => {
            let path = preview_path.unwrap_or_else(|| cli.temp_dir.join("preview.png"));
            let size = config.preview_size();
            export::save_png(&workspace.store().compose(size), &path)?;
            output::print_preview(&path, size);
            false
        }
        Command::Export {
            size,
            uhd,
            output_dir,
        } => {
            let size = if uhd { OutputSize::UHD } else { size };
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir());
            let path = export::export(workspace.store(), size, &output_dir, config.quality())?;
            output::print_export(path.as_deref(), size);
            false
        }
        Command::GenConfig => false,
    };

    if modified {
        workspace.save(&cli.session)?;
    }
    Ok(())
}
