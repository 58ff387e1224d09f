// src/main.rs

use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use dotenv::dotenv;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use mockup_media::waveform::{parse_hex_color, progress_ratio};
use mockup_media::waveform::terminal::render_ascii;
use mockup_media::{accept_filter, EditorConfig, EditorSession, MediaAsset, SlotMode, UploadFile};

#[derive(Parser, Debug)]
#[command(author, version, about = "Preview an upload the way the mockup's media slot sees it", long_about = None)]
struct Cli {
    /// File to upload into the slot.
    file: PathBuf,
    /// Media family selected in the properties panel.
    #[arg(short, long, value_enum, default_value_t = ModeArg::Visual)]
    mode: ModeArg,
    /// Declared MIME type; guessed from the extension when omitted.
    #[arg(long)]
    mime: Option<String>,
    /// JSON editor config.
    #[arg(short, long, env = "MOCKUP_MEDIA_CONFIG")]
    config: Option<PathBuf>,
    /// Optional avatar for the audio card.
    #[arg(long)]
    avatar: Option<PathBuf>,
    /// Print the result and exit instead of opening the player.
    #[arg(long)]
    no_ui: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Visual,
    Audio,
}

impl From<ModeArg> for SlotMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Visual => SlotMode::Visual,
            ModeArg::Audio => SlotMode::Audio,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load_from_disk(path)?,
        None => EditorConfig::default(),
    };
    let mut session = EditorSession::new(config)?;
    session.set_mode(cli.mode.into());

    let mime = cli
        .mime
        .clone()
        .unwrap_or_else(|| guess_mime(&cli.file).to_string());
    let file = UploadFile::from_path(&cli.file, mime).await?;
    println!(
        "📂 {} ({} bytes, {:?}), slot accepts {}",
        file.name,
        file.len(),
        file.mime,
        accept_filter(session.mode())
    );

    if let Err(e) = session.upload(file).await {
        eprintln!("❌ {}", e.notice());
        return Err(e.into());
    }

    if let Some(path) = &cli.avatar {
        let avatar = UploadFile::from_path(path, guess_mime(path)).await?;
        if let Err(e) = session.set_avatar(&avatar) {
            eprintln!("⚠️ Avatar skipped: {}", e.notice());
        }
    }

    describe(&session);

    if session.can_play() {
        if cli.no_ui {
            let mut out = stdout();
            paint_waveform(&mut out, &session)?;
            out.flush()?;
        } else {
            run_player(&mut session)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn describe(session: &EditorSession) {
    match session.slot().asset() {
        Some(MediaAsset::Image { url }) => {
            let head = url.get(..48).unwrap_or(url);
            println!("🖼️ Image: {head}… ({} chars)", url.len());
        }
        Some(MediaAsset::Animation(doc)) => {
            let h = doc.header();
            println!(
                "🎞️ Animation: {} {}x{} @ {} fps, {:?}",
                h.name.as_deref().unwrap_or("(unnamed)"),
                h.width.unwrap_or_default(),
                h.height.unwrap_or_default(),
                h.frame_rate.unwrap_or_default(),
                h.duration()
            );
        }
        Some(MediaAsset::Rig { bytes }) => println!("🦴 Rig: {} bytes", bytes.len()),
        Some(MediaAsset::Audio { url, .. }) => {
            let synthetic = session.envelope().is_some_and(|e| e.is_synthetic());
            println!(
                "🎧 Audio: {} at {} ({} envelope)",
                session.track_title(),
                url.as_str(),
                if synthetic { "synthetic" } else { "decoded" }
            );
        }
        None => println!("(slot empty)"),
    }
    if let Some(avatar) = session.avatar() {
        println!("🙂 Avatar: {} chars", avatar.len());
    }
}

fn run_player(session: &mut EditorSession) -> Result<(), anyhow::Error> {
    enable_raw_mode()?;
    let result = player_loop(session);
    disable_raw_mode()?;
    println!("\n🛑 Exiting preview.");
    result
}

fn player_loop(session: &mut EditorSession) -> Result<(), anyhow::Error> {
    // 20 FPS
    let frame = Duration::from_millis(50);
    let mut last_tick = Instant::now();
    let mut notice: Option<String> = None;

    session.tick(Duration::ZERO)?;
    draw(session, notice.as_deref())?;

    loop {
        if event::poll(frame)? {
            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Press {
                    if ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL) {
                        break;
                    }
                    match ev.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char(' ') => {
                            if let Err(e) = session.toggle_playback() {
                                notice = Some(e.notice());
                            }
                        }
                        KeyCode::Left => nudge(session, -0.05),
                        KeyCode::Right => nudge(session, 0.05),
                        KeyCode::Char(d) if d.is_ascii_digit() => {
                            let tenth = d.to_digit(10).unwrap_or(0) as f32 / 10.0;
                            session.seek_fraction(tenth);
                        }
                        _ => {}
                    }
                }
            }
        }

        let now = Instant::now();
        if let Err(e) = session.tick(now - last_tick) {
            notice = Some(e.notice());
        }
        last_tick = now;
        draw(session, notice.as_deref())?;
    }
    Ok(())
}

fn nudge(session: &mut EditorSession, delta: f32) {
    if let Some(state) = session.playback_state() {
        let at = progress_ratio(state.current_time, state.total_duration) as f32;
        session.seek_fraction(at + delta);
    }
}

fn draw(session: &EditorSession, notice: Option<&str>) -> Result<(), anyhow::Error> {
    let mut out = stdout();
    execute!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    write!(out, "🎵 {}\r\n\r\n", session.track_title())?;
    paint_waveform(&mut out, session)?;
    if let Some(state) = session.playback_state() {
        let icon = if state.is_playing { "▶️" } else { "⏸️" };
        write!(
            out,
            "\r\n  {icon} {} / {}\r\n",
            clock_text(state.current_time),
            clock_text(state.total_duration)
        )?;
    }
    write!(out, "\r\n[SPACE] Play/Pause | [←/→] Seek | [0-9] Jump | [Q] Quit\r\n")?;
    if let Some(text) = notice {
        write!(out, "\r\n⚠️ {text}\r\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Terminal bars, each column tinted with the configured played/unplayed colour.
fn paint_waveform(out: &mut impl Write, session: &EditorSession) -> std::io::Result<()> {
    let bars = session.waveform_bars();
    for line in render_ascii(&bars, session.config().canvas.height, 6) {
        queue!(out, Print("  "))?;
        for (glyph, bar) in line.chars().zip(&bars) {
            let color = parse_hex_color(session.bar_fill(bar))
                .map(|(r, g, b)| Color::Rgb { r, g, b })
                .unwrap_or(Color::Reset);
            queue!(out, SetForegroundColor(color), Print(glyph))?;
        }
        queue!(out, ResetColor, Print("\r\n"))?;
    }
    Ok(())
}

fn clock_text(t: Duration) -> String {
    let secs = t.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "json" => "application/json",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" | "aac" => "audio/aac",
        "riv" => "application/octet-stream",
        _ => "",
    }
}
