//! Scripted gesture replay with a fixed-step frame loop

use anyhow::{bail, Result};
use lumen_animation::AnimationScheduler;
use lumen_core::Gesture;
use lumen_theme::VisualParameterSet;

use crate::session::Session;

pub fn run(session: &Session, gestures: &[Gesture], frames: u32, fps: u32, trace: bool) -> Result<()> {
    if fps == 0 {
        bail!("--fps must be greater than zero");
    }
    let dt = 1.0 / fps as f32;

    let mut scheduler = AnimationScheduler::new();
    let mut toggle = session.mount(Some("simulate"));
    toggle.attach(&mut scheduler);

    println!(
        "start: {:?} effective={} {}",
        toggle.mode(),
        toggle.effective_theme(),
        describe(&toggle.frame())
    );

    for (index, gesture) in gestures.iter().enumerate() {
        let mode = toggle.handle_gesture(*gesture);
        println!(
            "#{} {:?} -> {:?} effective={}",
            index + 1,
            gesture,
            mode,
            toggle.effective_theme()
        );

        let mut ran = 0;
        while ran < frames {
            let active = scheduler.tick(dt);
            ran += 1;
            if trace {
                println!("  frame {:>4} {}", ran, describe(&toggle.frame()));
            }
            if !active {
                break;
            }
        }

        let state = if toggle.is_animating() {
            "in flight"
        } else {
            "settled"
        };
        println!("  {} after {} frames: {}", state, ran, describe(&toggle.frame()));
    }

    toggle.unmount(&mut scheduler);
    tracing::debug!("simulation done, {} callbacks left", scheduler.len());
    Ok(())
}

fn describe(frame: &VisualParameterSet) -> String {
    format!(
        "r={:.2} mask=({:.1}%, {:.1}%) rot={:.1} rays={:.3}",
        frame.orb_radius, frame.mask_center.0, frame.mask_center.1, frame.rotation, frame.ray_opacity
    )
}
