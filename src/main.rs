use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use netchess::core::{init_tracing, SessionSettings};
use netchess::game::types::{PieceColor, PromotionPiece, Square};
use netchess::game::{GameSession, LogView};
use netchess::networking::{LocalHub, RelayServer, RemoteTransport, RoomRequest};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "netchess")]
#[command(about = "Two-player networked chess", long_about = None)]
#[command(version)]
struct Cli {
    /// tracing filter, overrides the settings file (RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the room relay
    Relay {
        /// Address to listen on (default: relay_addr from settings)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Play a scripted game between two in-process participants
    Demo,

    /// Connect to a relay and play from the terminal
    Play {
        /// Relay address (default: relay_addr from settings)
        #[arg(short, long)]
        relay: Option<String>,

        /// Join this room instead of creating one
        #[arg(short, long)]
        join: Option<String>,
    },

    /// Show or initialise the settings file
    Config {
        /// Print the effective settings
        #[arg(long)]
        show: bool,

        /// Write default settings to the settings file
        #[arg(long)]
        write_default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = SessionSettings::load_or_default();
    if let Some(filter) = cli.log_filter {
        settings.log_filter = filter;
    }
    if let Err(e) = init_tracing(&settings.log_filter) {
        eprintln!("{e}");
    }

    match cli.command {
        Commands::Relay { bind } => {
            let addr = bind.unwrap_or_else(|| settings.relay_addr.clone());
            let server = RelayServer::bind(&addr)
                .await
                .with_context(|| format!("binding relay to {addr}"))?;
            server.run().await?;
        }
        Commands::Demo => run_demo()?,
        Commands::Play { relay, join } => {
            let addr = relay.unwrap_or_else(|| settings.relay_addr.clone());
            let request = match join.or_else(|| settings.room_code.clone()) {
                Some(code) => RoomRequest::Join(code),
                None => RoomRequest::Create(None),
            };
            play(&addr, request, &settings.player_name).await?;
        }
        Commands::Config {
            show,
            write_default,
        } => {
            if write_default {
                let path = SessionSettings::default().save()?;
                println!("Wrote default settings to {}", path.display());
            }
            if show || !write_default {
                println!("# {}", SessionSettings::default_path().display());
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
        }
    }

    Ok(())
}

/// Fool's mate between two sessions sharing a `LocalHub`
fn run_demo() -> Result<()> {
    let hub = LocalHub::new();
    let mut white = GameSession::new(
        Box::new(hub.join(true)),
        Box::new(LogView::new("White")),
        PieceColor::White,
        true,
    );
    let mut black = GameSession::new(
        Box::new(hub.join(false)),
        Box::new(LogView::new("Black")),
        PieceColor::Black,
        false,
    );

    white.start()?;
    black.start()?;
    settle(&mut [&mut white, &mut black]);

    let script = [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")];
    for (i, (from, to)) in script.iter().enumerate() {
        let mover = if i % 2 == 0 { &mut white } else { &mut black };
        click_move(mover, from, to)?;
        settle(&mut [&mut white, &mut black]);
    }

    let (w, b) = (white.game().board(), black.game().board());
    info!("[DEMO] Final position:\n{}", w);
    info!(
        "[DEMO] White sees \"{}\", Black sees \"{}\"",
        white.status_text(),
        black.status_text()
    );
    if w.fingerprint() != b.fingerprint() {
        bail!("mirrors diverged: {} vs {}", w.fingerprint_hex(), b.fingerprint_hex());
    }
    info!("[DEMO] Mirrors agree on board {}", w.fingerprint_hex());
    Ok(())
}

fn settle(sessions: &mut [&mut GameSession]) {
    loop {
        let handled: usize = sessions.iter_mut().map(|session| session.pump()).sum();
        if handled == 0 {
            return;
        }
    }
}

/// Drive a move through the input interface, as a click on the piece then the tile
fn click_move(session: &mut GameSession, from: &str, to: &str) -> Result<()> {
    let from = Square::from_algebraic(from).with_context(|| format!("bad square {from}"))?;
    let to = Square::from_algebraic(to).with_context(|| format!("bad square {to}"))?;
    let Some(piece) = session.game().board().piece_at(from) else {
        bail!("no piece on {from}");
    };
    session.piece_clicked(piece.id);
    session.tile_clicked(to);
    Ok(())
}

async fn play(addr: &str, request: RoomRequest, name: &str) -> Result<()> {
    info!("[NETWORK] {} connecting to {}", name, addr);
    let transport = RemoteTransport::connect(addr, request)
        .await
        .with_context(|| format!("connecting to relay at {addr}"))?;
    println!("Room {} - you play {}", transport.room_code(), transport.color());
    println!("Enter moves like e2e4, q/r/b/n to promote, quit to leave.");

    let color = transport.color();
    let authority = transport.is_authority();
    let mut session = GameSession::new(
        Box::new(transport),
        Box::new(LogView::new(name)),
        color,
        authority,
    );
    session.start()?;

    let (line_tx, line_rx) = crossbeam_channel::unbounded::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines().map_while(Result::ok) {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut last_status = String::new();
    while !session.game().is_game_over() {
        session.pump();

        if let Ok(line) = line_rx.try_recv() {
            let line = line.trim().to_lowercase();
            match line.as_str() {
                "quit" | "leave" => session.leave(),
                "q" | "r" | "b" | "n" => {
                    let choice = match line.as_str() {
                        "q" => PromotionPiece::Queen,
                        "r" => PromotionPiece::Rook,
                        "b" => PromotionPiece::Bishop,
                        _ => PromotionPiece::Knight,
                    };
                    session.promotion_chosen(choice);
                }
                mv if mv.len() == 4 && mv.is_ascii() => {
                    if let Err(e) = click_move(&mut session, &mv[..2], &mv[2..]) {
                        warn!("[INPUT] {}", e);
                    }
                }
                "" => {}
                other => warn!("[INPUT] Unrecognised input {:?}", other),
            }
        }

        let status = session.status_text();
        if status != last_status {
            println!("{}\n{}", session.game().board(), status);
            last_status = status;
        }
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    println!("{}", session.status_text());
    Ok(())
}
