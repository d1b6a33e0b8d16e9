use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use clap::Parser;
use eyre::{eyre, WrapErr};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

use app::{command_for, Session};
use config::ConfigStore;
use graphics::typeface::Typeface;
use layout::Size;
use render::DrawHandle;

/// Screens, key handling and the scrolling session
pub mod app;

/// Command line overrides
pub mod cli;

/// Persisted settings
pub mod config;

/// Graphics primitives, such as typeface and color
pub mod graphics;

/// Geometry of the window and the text area
pub mod layout;

/// Rendering engine implementation
pub mod render;

/// Script loading, wrapping and scrolling
pub mod script;

type WindowSurface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    let store = ConfigStore::default_location();
    match &store {
        Some(store) => log::debug!("settings file: {}", store.path().display()),
        None => log::warn!("no home directory; settings will not be saved"),
    }
    let mut config = store.as_ref().map(ConfigStore::load).unwrap_or_default();
    args.apply(&mut config);
    config.log_summary();

    let typeface = Typeface::load(config.font_path.as_deref())?;
    log::info!("font: {}", typeface.source());

    let event_loop = EventLoop::new().wrap_err("creating event loop")?;
    let window = WindowBuilder::new()
        .with_title("Delta Teleprompter")
        .with_inner_size(PhysicalSize::new(
            u32::from(config.window_width),
            u32::from(config.window_height),
        ))
        .with_fullscreen(config.full_screen.then_some(Fullscreen::Borderless(None)))
        .build(&event_loop)
        .wrap_err("creating window")?;
    let window = Rc::new(window);

    // softbuffer errors aren't always Send + Sync, so they are flattened into the report
    let context = softbuffer::Context::new(Rc::clone(&window)).map_err(|err| eyre!("creating graphics context: {err}"))?;
    let mut surface =
        softbuffer::Surface::new(&context, Rc::clone(&window)).map_err(|err| eyre!("creating surface: {err}"))?;

    let mut session = Session::new(config, typeface, viewport(&window), Instant::now());

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => elwt.exit(),

            WindowEvent::Resized(_) => {
                session.resize(viewport(&window));
                window.request_redraw();
            }

            WindowEvent::KeyboardInput { event: key, .. } if key.state == ElementState::Pressed => {
                let Some(command) = command_for(key.logical_key.as_ref()) else {
                    return;
                };
                session.handle(command, key.repeat, Instant::now());
                if session.should_exit() {
                    elwt.exit();
                    return;
                }
                sync_full_screen(&window, session.config().full_screen);
                window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = redraw(&window, &mut surface, &mut session) {
                    log::error!("{err:#}");
                    elwt.exit();
                }
            }

            _ => (),
        },

        Event::AboutToWait => {
            if session.update(Instant::now()) {
                window.request_redraw();
            }
            elwt.set_control_flow(match session.next_deadline() {
                Some(deadline) => ControlFlow::WaitUntil(deadline),
                None => ControlFlow::Wait,
            });
        }

        Event::LoopExiting => {
            if let Some(store) = &store {
                if let Err(err) = store.save(session.config()) {
                    log::error!("cannot save settings: {err}");
                }
            }
        }

        _ => (),
    })
    .map_err(|err| eyre!("event loop: {err}"))
}

fn viewport(window: &Window) -> Size {
    let size = window.inner_size();
    Size {
        width: size.width as usize,
        height: size.height as usize,
    }
}

fn sync_full_screen(window: &Window, full_screen: bool) {
    if window.fullscreen().is_some() != full_screen {
        window.set_fullscreen(full_screen.then_some(Fullscreen::Borderless(None)));
    }
}

fn redraw(window: &Window, surface: &mut WindowSurface, session: &mut Session) -> eyre::Result<()> {
    let size = window.inner_size();
    let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
        // Minimized
        return Ok(());
    };
    surface
        .resize(width, height)
        .map_err(|err| eyre!("resizing surface: {err}"))?;

    let mut buffer = surface.buffer_mut().map_err(|err| eyre!("getting frame buffer: {err}"))?;
    session.draw(&mut DrawHandle::new(&mut buffer, size.width as usize, size.height as usize));
    buffer.present().map_err(|err| eyre!("presenting frame: {err}"))?;
    Ok(())
}
