use log::info;
use pixelforge::command::{
    ApplyPixelsCommand, DuplicateFrameCommand, MoveLayerCommand, SetLayerOpacityCommand,
};
use pixelforge::model::LayerStackError;
use pixelforge::render::RenderInput;
use pixelforge::{
    Color, CommandManager, EditorConfig, Frame, Layer, LayerStack, PixelBuffer, PixelChange,
    RenderLayerManager, Timeline,
};

const CANVAS_WIDTH: u32 = 8;
const CANVAS_HEIGHT: u32 = 4;

/// One character per pixel: dominant channel, '.' for transparent
fn print_buffer(title: &str, buffer: &PixelBuffer) {
    println!("{}", title);
    for y in 0..buffer.height() as i32 {
        let row: String = (0..buffer.width() as i32)
            .map(|x| match buffer.get(x, y) {
                None => '.',
                Some(c) if c.r > c.g && c.r > c.b => 'R',
                Some(c) if c.b > c.r && c.b > c.g => 'B',
                Some(c) if c.g > c.r && c.g > c.b => 'G',
                Some(_) => '#',
            })
            .collect();
        println!("  {}", row);
    }
}

fn main() -> Result<(), LayerStackError> {
    env_logger::init();

    println!("=== Pixelforge ===");

    // Optional config path as first argument
    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load_or_default(path),
        None => EditorConfig::default(),
    };

    let mut red = Layer::with_pixels("red", PixelBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT));
    for y in 0..CANVAS_HEIGHT as i32 {
        for x in 0..(CANVAS_WIDTH / 2) as i32 {
            red.pixels.set(x, y, Some(Color::RED));
        }
    }
    let mut blue = Layer::with_pixels(
        "blue",
        PixelBuffer::filled(CANVAS_WIDTH, CANVAS_HEIGHT, Color::BLUE),
    );
    blue.opacity = 0.5;

    let layers = LayerStack::from_layers(vec![red, blue])?;
    let timeline = Timeline::new(Frame::new(layers)).into_handle();
    let stack = timeline.borrow().current_frame().layers();

    let mut history = CommandManager::from_config(&config.history);
    let mut renderer = RenderLayerManager::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let overlays = RenderLayerManager::overlays_for(&config.overlay);

    let mut show = |title: &str| {
        let stack = stack.borrow();
        renderer.render(&RenderInput::new(&stack).with_overlays(&overlays));
        print_buffer(title, renderer.composited());
    };

    show("Initial");

    history.execute(Box::new(SetLayerOpacityCommand::new(&stack, 0, 1.0, 0.5)));
    show("Red layer at 50%");

    history.execute(Box::new(ApplyPixelsCommand::new(
        &stack,
        0,
        (0..CANVAS_WIDTH as i32)
            .map(|x| PixelChange::paint(x, 0, Color::GREEN))
            .collect(),
    )));
    history.execute(Box::new(MoveLayerCommand::single(&stack, 0, 1)));
    show("Painted and moved below blue");

    while let Ok(description) = history.undo() {
        info!("Undid: {}", description);
    }
    show("After undoing everything");

    history.execute(Box::new(DuplicateFrameCommand::new(&timeline, 0)));
    println!("Frames after duplicate: {}", timeline.borrow().len());
    if let Ok(description) = history.undo() {
        info!("Undid: {}", description);
    }
    println!("Frames after undo: {}", timeline.borrow().len());
    Ok(())
}
