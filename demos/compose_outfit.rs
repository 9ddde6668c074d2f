use image::{Rgba, RgbaImage};
use outfitter::{
    Archetype, Catalog, Category, DevicePoint, ImageSource, ImageStore, OverlayAsset,
    PaintSurface, SnapshotOptions, Stage, StageRect, Tool, TransferPayload,
    interact::handle_drop,
    snapshot::render_snapshot,
    steps::{self, OpacityDirection, RotateDirection},
};

fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> anyhow::Result<Vec<u8>> {
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut catalog = Catalog::builder()
        .asset(
            Archetype::Male,
            OverlayAsset::new(
                "m-shirt-1",
                Category::Top,
                "Shirt",
                ImageSource::Encoded(solid_png(64, 64, [220, 40, 40, 255])?),
            ),
        )
        .asset(
            Archetype::Male,
            OverlayAsset::new(
                "m-pants-1",
                Category::Bottom,
                "Pants",
                ImageSource::Encoded(solid_png(64, 96, [40, 60, 200, 255])?),
            ),
        )
        .build()?;

    // Drop both entries onto a 400x400 stage.
    let mut stage = Stage::new();
    let rect = StageRect::new(0.0, 0.0, 400.0, 400.0)?;
    for (id, at) in [("m-shirt-1", (200.0, 140.0)), ("m-pants-1", (200.0, 260.0))] {
        let payload = TransferPayload::for_asset(catalog.get(id).unwrap()).to_json()?;
        handle_drop(&mut stage, rect, DevicePoint::new(at.0, at.1), &payload);
    }

    // Tweak the shirt through the discrete controls.
    if let Some(shirt) = stage.items().first().map(|item| item.instance) {
        stage.select(shirt);
        steps::rotate_selected(&mut stage, RotateDirection::Clockwise);
        steps::fade_selected(&mut stage, OpacityDirection::Decrease);
    }

    // Doodle a badge, save it as a custom asset, and stage it too.
    let mut paint = PaintSurface::new(128, 128)?;
    paint.set_tool(Tool::Circle);
    paint.set_stroke_width(8);
    paint.pointer_down(64, 64);
    paint.pointer_up(100, 64);
    let design = paint.save_custom("Badge", Category::Custom)?;
    let payload = TransferPayload::for_asset(&design).to_json()?;
    catalog.register_custom(design)?;
    handle_drop(&mut stage, rect, DevicePoint::new(320.0, 80.0), &payload);

    let mut store = ImageStore::new();
    let shot = render_snapshot(&stage, &mut store, None, SnapshotOptions::new(512, 512)?)?;

    let out_path = std::path::Path::new("target").join("compose_outfit.png");
    shot.write_png(&out_path)?;
    eprintln!("wrote {} ({} items staged)", out_path.display(), stage.len());
    Ok(())
}
