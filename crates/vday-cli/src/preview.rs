//! Terminal walkthrough of the slideshow.
//!
//! Stdin drives the controller, the controller's media commands drive the
//! narration player, and the view snapshot is printed after every step,
//! the same snapshot a graphical frontend would render.

use std::io::{self, BufRead, Write};
use std::path::Path;

use vday_core::controller::{MediaCommand, Slideshow, View};
use vday_core::pages::PageId;
use vday_lib::player::NarrationPlayer;

const HELP: &str = "commands: n(ext) p(rev) g <page> t(oggle) b(eginning) l(atest) q(uit)";

pub fn run(audio_dir: &Path, json: bool) -> Result<(), String> {
    let mut player = NarrationPlayer::new(audio_dir)?;
    let mut show = Slideshow::new();

    println!("{HELP}");
    render(&show.view(), json);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        // Reap clips that played to the end since the last prompt.
        if let Some(year) = player.finished_year() {
            show.playback_ended(year);
        }

        print!("> ");
        io::stdout().flush().map_err(|e| format!("stdout: {e}"))?;
        let Some(line) = lines.next() else { break };
        let line = line.map_err(|e| format!("stdin: {e}"))?;

        let commands = match line.trim() {
            "q" | "quit" => break,
            "n" | "next" => show.go_next(),
            "p" | "prev" => show.go_prev(),
            "b" | "beginning" => show.go_to_beginning(),
            "l" | "latest" => show.go_to_latest(),
            "" | "t" | "toggle" => show.toggle_narration(),
            other => match other.strip_prefix("g ").and_then(PageId::parse) {
                Some(page) => show.show_page(page),
                None => {
                    println!("{HELP}");
                    continue;
                }
            },
        };

        apply(&mut player, &mut show, &commands);
        render(&show.view(), json);
    }
    Ok(())
}

/// Run the media commands and feed the outcome back into the controller.
fn apply(player: &mut NarrationPlayer, show: &mut Slideshow, commands: &[MediaCommand]) {
    if commands.is_empty() {
        return;
    }
    match player.run(commands) {
        Ok(()) => {
            for command in commands {
                if let MediaCommand::Play { year, .. } = command {
                    show.playback_started(*year);
                }
            }
        }
        Err(e) => {
            eprintln!("narration unavailable: {}", e.reason);
            show.playback_failed(e.year);
        }
    }
}

fn render(view: &View, json: bool) {
    if json {
        match serde_json::to_string_pretty(view) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("cannot render view: {e}"),
        }
        return;
    }

    let strip: Vec<String> = view
        .dots
        .iter()
        .map(|m| {
            if m.active {
                format!("[{}]", m.id)
            } else {
                m.id.to_string()
            }
        })
        .collect();
    println!("{}", strip.join(" "));

    let mut nav = Vec::new();
    if view.prev.enabled {
        nav.push(format!("prev: {}", nav_label(&view.prev.year_label)));
    }
    if view.next.enabled {
        nav.push(format!("next: {}", nav_label(&view.next.year_label)));
    }
    if !nav.is_empty() {
        println!("{}", nav.join("   "));
    }

    match &view.narration {
        Some(button) if button.enabled => println!("narration: {}", button.label),
        Some(_) => println!("narration: no clip for this year"),
        None => println!("(reflections page)"),
    }
}

fn nav_label(year_label: &str) -> &str {
    if year_label.is_empty() {
        "reflections"
    } else {
        year_label
    }
}
