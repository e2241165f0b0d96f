use iso_editor::{
    app::{Application, ApplicationBuilder, ApplicationEvent, input::FrameInput},
    editor::Editor,
    engine::config::EditorConfigs,
    level::Level,
    log,
    render::opengl::SpriteRenderer,
    tile::{
        catalog::{JsonContentLoader, TileCatalog},
        projection::ProjectionTransform,
        rendering::TileGridRenderer,
    },
    ui::{UiSystem, editor_panel::EditorPanel},
    utils::{FrameClock, Vec2},
};

// ----------------------------------------------
// main()
// ----------------------------------------------

fn main() {
    let configs = EditorConfigs::load();

    log::configure(&configs.log);

    let mut app = match ApplicationBuilder::new()
        .window_title(&configs.window_title)
        .window_size(configs.window_size)
        .confine_cursor_to_window(configs.confine_cursor_to_window)
        .build()
    {
        Ok(app) => app,
        Err(err) => {
            log::error!("app", "{err}");
            std::process::exit(1);
        }
    };

    let mut sprite_renderer = match SpriteRenderer::new(app.window_size(),
                                                        app.framebuffer_size(),
                                                        configs.window_background_color,
                                                        configs.textures_dir.clone()) {
        Ok(renderer) => renderer,
        Err(err) => {
            log::error!("render", "{err}");
            std::process::exit(1);
        }
    };

    let mut ui_sys = UiSystem::new(&mut app);
    let mut editor_panel = EditorPanel::new(&configs);

    // Without a tile type table every cell draws as the placeholder, which is still editable.
    let catalog = TileCatalog::load(&JsonContentLoader, &configs.tile_types_path, &mut sprite_renderer)
        .unwrap_or_else(|err| {
            log::error!("catalog", "Failed to load tile types: {err}");
            TileCatalog::default()
        });

    let default_code = catalog.first_code().unwrap_or(configs.default_reference_code);

    let level = match Level::new(configs.default_grid_rows, configs.default_grid_cols, default_code, app.window_size()) {
        Ok(level) => level,
        Err(err) => {
            log::error!("level", "Failed to create initial level: {err}");
            std::process::exit(1);
        }
    };

    let mut editor = Editor::new(&configs, level);
    let mut grid_renderer = TileGridRenderer::new();
    let mut frame_input = FrameInput::new();
    let mut frame_clock = FrameClock::new();

    while !app.should_quit() {
        let delta_time = frame_clock.delta_time();

        for event in app.poll_events() {
            match event {
                ApplicationEvent::Quit => {
                    app.request_quit();
                }
                ApplicationEvent::WindowResize(window_size) => {
                    sprite_renderer.set_viewport_size(window_size, app.framebuffer_size());
                    editor.set_viewport_size(window_size);
                }
                ApplicationEvent::KeyInput(key, action, _modifiers) => {
                    ui_sys.on_key_input(key, action);
                }
                ApplicationEvent::CharInput(c) => {
                    ui_sys.on_char_input(c);
                }
                ApplicationEvent::Scroll(amount) => {
                    if !ui_sys.on_scroll(amount).is_handled() {
                        frame_input.add_scroll(amount.y);
                    }
                }
                ApplicationEvent::MouseButton(..) => {
                    // Buttons are polled through FrameInput.
                }
            }
        }

        app.sample_input(&mut frame_input);

        editor.set_controls_enabled(!ui_sys.is_handling_mouse_input() && !ui_sys.is_handling_key_input());
        editor.update(&frame_input, delta_time);

        sprite_renderer.set_builtin_sprite_size(tile_footprint(editor.tile_size(), editor.projection()));
        sprite_renderer.begin_frame();
        editor.draw(&mut sprite_renderer, &catalog, &mut grid_renderer);
        sprite_renderer.end_frame();

        ui_sys.frame(&app, &frame_input, delta_time, |ui| {
            editor_panel.draw(ui, &mut editor, &catalog, &mut grid_renderer);
        });

        app.present();
        frame_input.end_frame();
        frame_clock.end_frame();
    }
}

// Screen extent of one flat cell at zoom 1. Built-in textures
// (placeholder, highlight) are stretched over it.
fn tile_footprint(tile_size: f32, projection: &ProjectionTransform) -> Vec2 {
    let corners = [
        Vec2::zero(),
        Vec2::new(tile_size, 0.0),
        Vec2::new(0.0, tile_size),
        Vec2::new(tile_size, tile_size),
    ].map(|corner| projection.forward(corner));

    let (min, max) = corners.iter().fold((corners[0], corners[0]), |(min, max), p| {
        (Vec2::new(min.x.min(p.x), min.y.min(p.y)), Vec2::new(max.x.max(p.x), max.y.max(p.y)))
    });

    max - min
}
