use anyhow::Result;
use keyframe_core::mock::{MockClock, MockStyleSheet, RecordingLogger};
use keyframe_core::{
    Animation, AnimationDocument, Environment, Keyframe, PlayState, PlayerEvent, TimingRecord,
};
use std::rc::Rc;

struct Stage {
    clock: Rc<MockClock>,
    sheet: Rc<MockStyleSheet>,
    logger: Rc<RecordingLogger>,
}

impl Stage {
    fn new() -> Self {
        Self {
            clock: Rc::new(MockClock::new()),
            sheet: Rc::new(MockStyleSheet::new()),
            logger: Rc::new(RecordingLogger::new()),
        }
    }

    fn env(&self) -> Environment<&'static str> {
        let env: Environment<&'static str> =
            Environment::new(self.clock.clone(), self.sheet.clone());
        env.with_logger(self.logger.clone())
    }
}

fn grow() -> Vec<Keyframe> {
    vec![
        Keyframe::new().set("width", "0px"),
        Keyframe::new().set("width", "100px"),
    ]
}

#[test]
fn animates_width_to_completion() -> Result<()> {
    let stage = Stage::new();
    let animation = Animation::new(&grow(), TimingRecord::new(1000).fill("forwards"), stage.env())?;
    let mut player = animation.start("box");
    assert_eq!(stage.sheet.get("box", "width"), "0px");

    stage.clock.fast_forward(500.0);
    player.tick();
    assert_eq!(stage.sheet.get("box", "width"), "50px");
    assert_eq!(player.state(), PlayState::Playing);

    stage.clock.fast_forward(500.0);
    assert_eq!(player.tick(), PlayState::Finished);
    assert_eq!(stage.sheet.get("box", "width"), "100px");

    let events = player.drain_events();
    assert_eq!(
        events,
        vec![
            PlayerEvent::Started {
                player_id: player.id()
            },
            PlayerEvent::Finished {
                player_id: player.id()
            },
        ]
    );
    Ok(())
}

#[test]
fn fill_none_reverts_to_pre_animation_value() -> Result<()> {
    let stage = Stage::new();
    stage.sheet.set("box", "width", "33px");
    let animation = Animation::new(&grow(), 200.0, stage.env())?;
    let mut player = animation.start("box");

    stage.clock.fast_forward(250.0);
    player.tick();
    assert_eq!(player.state(), PlayState::Finished);
    assert_eq!(stage.sheet.get("box", "width"), "33px");
    Ok(())
}

#[test]
fn fill_forwards_keeps_final_value() -> Result<()> {
    let stage = Stage::new();
    stage.sheet.set("box", "width", "33px");
    let animation = Animation::new(&grow(), TimingRecord::new(200).fill("forwards"), stage.env())?;
    let mut player = animation.start("box");

    stage.clock.fast_forward(250.0);
    player.tick();
    assert_eq!(stage.sheet.get("box", "width"), "100px");
    Ok(())
}

#[test]
fn cancel_restores_values_regardless_of_fill() -> Result<()> {
    let stage = Stage::new();
    stage.sheet.set("box", "width", "12px");
    let animation = Animation::new(&grow(), TimingRecord::new(1000).fill("forwards"), stage.env())?;
    let mut player = animation.start("box");

    stage.clock.fast_forward(300.0);
    player.tick();
    assert_eq!(stage.sheet.get("box", "width"), "30px");

    player.cancel();
    assert_eq!(player.state(), PlayState::Cancelled);
    assert_eq!(stage.sheet.get("box", "width"), "12px");
    assert!(matches!(
        player.drain_events().last(),
        Some(PlayerEvent::Cancelled { .. })
    ));
    Ok(())
}

#[test]
fn delay_with_backwards_fill_holds_first_keyframe() -> Result<()> {
    let stage = Stage::new();
    stage.sheet.set("box", "width", "80px");
    let timing = TimingRecord::new(100).delay(100).fill("backwards");
    let animation = Animation::new(&grow(), timing, stage.env())?;
    let mut player = animation.start("box");
    assert_eq!(stage.sheet.get("box", "width"), "0px");

    stage.clock.fast_forward(50.0);
    player.tick();
    assert_eq!(stage.sheet.get("box", "width"), "0px");

    stage.clock.fast_forward(100.0);
    player.tick();
    assert_eq!(stage.sheet.get("box", "width"), "50px");

    stage.clock.fast_forward(50.0);
    player.tick();
    assert_eq!(player.state(), PlayState::Finished);
    assert_eq!(stage.sheet.get("box", "width"), "80px");
    Ok(())
}

#[test]
fn hyphenated_properties_animate_with_warning() -> Result<()> {
    let stage = Stage::new();
    let keyframes = vec![
        Keyframe::new().set("z-index", 0),
        Keyframe::new().set("z-index", 10),
    ];
    let animation = Animation::new(&keyframes, 100.0, stage.env())?;
    let mut player = animation.start("box");

    stage.clock.fast_forward(44.0);
    player.tick();
    assert_eq!(stage.sheet.get("box", "z-index"), "4");
    assert_eq!(stage.sheet.get("box", "zIndex"), "");

    let warnings = stage.logger.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("zIndex"));
    Ok(())
}

#[test]
fn multi_property_timeline_from_document() -> Result<()> {
    let stage = Stage::new();
    let document = AnimationDocument::from_json(
        r#"{
            "keyframes": [
                { "color": "rgba(0, 255, 0, 0)", "transform": "scale(4)" },
                { "color": "rgba(0, 255, 0, 1)", "transform": "scale(8) rotate(360deg)" }
            ],
            "timing": { "duration": 1000, "fill": "both" }
        }"#,
    )?;
    let animation = Animation::from_document(&document, stage.env())?;
    let mut player = animation.start("box");
    assert_eq!(stage.sheet.get("box", "transform"), "scale(4, 1) rotate(0deg)");

    stage.clock.fast_forward(500.0);
    player.tick();
    assert_eq!(stage.sheet.get("box", "color"), "rgba(0,255,0,0.5)");
    assert_eq!(stage.sheet.get("box", "transform"), "scale(6, 1) rotate(180deg)");

    stage.clock.fast_forward(500.0);
    player.tick();
    assert_eq!(stage.sheet.get("box", "color"), "rgba(0,255,0,1)");
    assert_eq!(stage.sheet.get("box", "transform"), "scale(8, 1) rotate(360deg)");
    Ok(())
}

#[test]
fn on_finish_callback_fires_once() -> Result<()> {
    let stage = Stage::new();
    let animation = Animation::new(&grow(), 100.0, stage.env())?;
    let mut player = animation.create("box");

    let finished = Rc::new(std::cell::Cell::new(0u32));
    let counter = finished.clone();
    player.set_on_finish(move || counter.set(counter.get() + 1));
    player.play();

    for _ in 0..10 {
        stage.clock.fast_forward(16.0);
        player.tick();
    }
    assert_eq!(finished.get(), 1);
    assert!(stage.clock.frame_requests() >= 6);
    Ok(())
}
