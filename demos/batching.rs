//! Batch a small diagram and print the resulting draw calls.
//!
//! Run with `RUST_LOG=draw3d_optimizer=trace cargo run --example batching --features tracing`.

use draw3d_optimizer::{
    Color, FontId, LinePrimitive, LineStyle, Optimizer, Primitive, PrimitiveError,
    RectanglePrimitive, RenderRule, TextPrimitive,
};
use glam::vec2;
use tracing_subscriber::EnvFilter;

fn figure(x: f32, name: &str) -> Result<Vec<Primitive>, PrimitiveError> {
    let fill = RenderRule::gradient(Color::rgb(200, 220, 255), Color::WHITE, false);
    let stroke = RenderRule::outline(Color::BLACK, 1, LineStyle::Solid)?;
    let font = RenderRule::text(FontId(0), Color::BLACK);
    Ok(vec![
        RectanglePrimitive::new(vec2(x, 10.0), vec2(40.0, 20.0), fill)?.into(),
        RectanglePrimitive::new(vec2(x, 10.0), vec2(40.0, 20.0), stroke)?.into(),
        TextPrimitive::new(name, vec2(x + 4.0, 14.0), vec2(30.0, 8.0), font)?.into(),
    ])
}

fn main() -> Result<(), PrimitiveError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let dashed = RenderRule::outline(Color::rgb(80, 80, 80), 1, LineStyle::Dash)?;
    let mut optimizer = Optimizer::new();
    for (i, name) in ["Order", "Customer", "Invoice", "Payment"].iter().enumerate() {
        let x = i as f32 * 60.0;
        optimizer.extend(figure(x, name)?);
        if i > 0 {
            optimizer.push(LinePrimitive::new(vec2(x - 20.0, 20.0), vec2(x, 20.0), dashed)?.into());
        }
    }

    let stats = optimizer.stats();
    for (i, batch) in optimizer.finish().iter().enumerate() {
        println!("draw call {}: {} ({} primitives)", i, batch.class(), batch.len());
    }
    println!(
        "{} primitives in {} draw calls, {} reordered",
        stats.primitives, stats.batches, stats.reordered
    );
    Ok(())
}
