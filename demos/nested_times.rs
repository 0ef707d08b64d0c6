use strata::{Document, NoProgress, RenderSettings, Time, TracingProgress};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/nested_scene.json");
    let doc = Document::from_json_str(s)?;
    let root = doc.instantiate()?;

    let times: Vec<f64> = root.get_times().iter().map(|t| t.as_secs()).collect();
    println!("keyframe times: {times:?}");

    for t in [0.0, 0.25, 0.5] {
        let frame = strata::render_frame(&root, Time::seconds(t), &RenderSettings::default(), &mut NoProgress)?;
        let center = frame.surface.get(50, 50).unwrap_or_default();
        println!("t={t}: center alpha {:.3} ({:?})", center.a, frame.outcome);
    }

    let mut cb = TracingProgress::default();
    strata::render_frame(&root, Time::ZERO, &RenderSettings::from_env(), &mut cb)?;
    Ok(())
}
