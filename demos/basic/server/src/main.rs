use glam::{DVec3, IVec2};
use log::info;

use scenecast_server::{GuiServer, ScenecastServerError, ServerConfig};

const PORT: u16 = 8070;

fn main() -> Result<(), ScenecastServerError> {
    env_logger::init();

    let server = GuiServer::new(ServerConfig::default());
    server.serve(PORT)?;
    info!("Open the viewer against ws://localhost:{}", PORT);

    server
        .create_box(
            "crate",
            DVec3::splat(0.5),
            DVec3::new(0.0, 0.25, 0.0),
            DVec3::ZERO,
            DVec3::new(0.8, 0.5, 0.2),
            true,
            true,
        )
        .create_sphere("ball", 0.2, DVec3::new(1.0, 0.2, 0.0), DVec3::ONE, true, true)
        .render_basis(1.0, "basis", DVec3::ZERO, DVec3::ZERO)
        .create_text("hint", "Drag the ball, press keys", IVec2::new(10, 10), IVec2::new(300, 20));

    server.register_drag_listener("ball", |pos| info!("Ball dragged to {}", pos));

    let shade = server.clone();
    server.create_slider(
        "shade",
        IVec2::new(10, 40),
        IVec2::new(200, 20),
        0.0,
        1.0,
        0.5,
        false,
        true,
        move |value| {
            shade.set_object_color("crate", DVec3::new(0.8, value, 0.2));
        },
    );

    let reset = server.clone();
    server.create_button("reset", "Reset", IVec2::new(10, 70), IVec2::new(80, 24), move || {
        reset.set_object_position("ball", DVec3::new(1.0, 0.2, 0.0));
    });

    server.register_keydown_listener(|key| info!("Key down: {}", key));
    server.register_shutdown_listener(|| info!("Shutting down"));

    server.block_while_serving(|| Ok::<(), ScenecastServerError>(()))
}
