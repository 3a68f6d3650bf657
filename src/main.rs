use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Context, Result};
use keyframe_config::KeyframeConfig;
use keyframe_core::{
    Animation, AnimationDocument, Environment, ManualClock, PlayerEvent, StyleSink, TracingLogger,
};
use tracing::{info, Level};

/// Frame step of the demo loop (60 Hz).
const FRAME_MS: f64 = 1000.0 / 60.0;

const SAMPLE_DOCUMENT: &str = r#"{
    "keyframes": [
        { "width": "0px", "opacity": 0, "backgroundColor": "rgba(0, 128, 255, 0)", "transform": "scale(1)" },
        { "offset": 0.25, "opacity": 1 },
        { "width": "240px", "opacity": 0.6, "backgroundColor": "rgb(0, 128, 255)", "transform": "scale(2) rotate(90deg)" }
    ],
    "timing": { "duration": 500, "delay": 100, "easing": "ease-in-out", "fill": "both" }
}"#;

/// Style sink that prints every write and keeps the latest values.
#[derive(Default)]
struct ConsoleStyleSink {
    styles: RefCell<BTreeMap<(String, String), String>>,
}

impl StyleSink<String> for ConsoleStyleSink {
    fn read_style(&self, element: &String, property: &str) -> String {
        self.styles
            .borrow()
            .get(&(element.clone(), property.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn write_style(&self, element: &String, property: &str, value: &str) {
        info!(element = %element, property, value, "style");
        self.styles
            .borrow_mut()
            .insert((element.clone(), property.to_string()), value.to_string());
    }
}

fn load_document() -> Result<AnimationDocument> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read animation document {}", path))?;
            AnimationDocument::from_json(&json)
                .with_context(|| format!("failed to parse animation document {}", path))
        }
        None => AnimationDocument::from_json(SAMPLE_DOCUMENT).context("invalid sample document"),
    }
}

fn main() -> Result<()> {
    let config = KeyframeConfig::load();
    let level = Level::from_str(&config.logging.level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let document = load_document()?;
    let clock = Rc::new(ManualClock::new());
    let sink = Rc::new(ConsoleStyleSink::default());
    let env: Environment<String> = Environment::from_config(clock.clone(), sink.clone(), &config)
        .with_logger(Rc::new(TracingLogger));

    let animation =
        Animation::from_document(&document, env).context("failed to build animation")?;
    info!(
        properties = ?animation.animated_properties(),
        duration = animation.options().duration,
        "animation ready"
    );

    let mut player = animation.create("demo".to_string());
    player.set_on_finish(|| info!("animation finished"));
    player.play();

    let mut frames = 0u32;
    while player.is_playing() {
        clock.fast_forward(FRAME_MS);
        player.tick();
        frames += 1;
    }

    for event in player.drain_events() {
        match event {
            PlayerEvent::Started { player_id } => info!(%player_id, "started"),
            PlayerEvent::Finished { player_id } => info!(%player_id, frames, "finished"),
            PlayerEvent::Cancelled { player_id } => info!(%player_id, "cancelled"),
        }
    }

    let final_styles = serde_json::to_string_pretty(
        &sink
            .styles
            .borrow()
            .iter()
            .map(|((_, property), value)| (property.clone(), value.clone()))
            .collect::<BTreeMap<_, _>>(),
    )?;
    println!("{}", final_styles);
    Ok(())
}
