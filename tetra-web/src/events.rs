/// DOM event wiring and the animation-frame loop.
///
/// Every callback lives for the rest of the page, so closures are leaked with
/// `forget` once registered.
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Event, EventTarget, MouseEvent, WheelEvent, Window};

use crate::error::Result;
use crate::viewer::Viewer;

type Shared = Rc<RefCell<Viewer>>;

pub fn install(viewer: &Shared) -> Result<()> {
    let (window, canvas, toggle) = {
        let viewer = viewer.borrow();
        let dom = &viewer.view.dom;
        (dom.window.clone(), dom.canvas.clone(), dom.toggle.clone())
    };

    let shared = viewer.clone();
    listen(&toggle, "click", move |_: Event| {
        if let Err(err) = shared.borrow_mut().toggle_display_mode() {
            log::error!("display toggle failed: {err}");
        }
    })?;

    let shared = viewer.clone();
    listen(&window, "resize", move |_: Event| {
        if let Err(err) = shared.borrow_mut().resize() {
            log::error!("resize failed: {err}");
        }
    })?;

    let shared = viewer.clone();
    listen(&canvas, "pointerdown", move |event: Event| {
        if let Some((x, y)) = client_position(&event) {
            shared.borrow_mut().app.pointer_down(x, y);
        }
    })?;

    // Drags keep tracking once the pointer leaves the canvas
    let shared = viewer.clone();
    listen(&window, "pointermove", move |event: Event| {
        if let Some((x, y)) = client_position(&event) {
            shared.borrow_mut().app.pointer_move(x, y);
        }
    })?;

    let shared = viewer.clone();
    listen(&window, "pointerup", move |_: Event| {
        shared.borrow_mut().app.pointer_up();
    })?;

    let shared = viewer.clone();
    listen(&canvas, "wheel", move |event: Event| {
        if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
            wheel.prevent_default();
            shared.borrow_mut().app.wheel(wheel.delta_y() as f32);
        }
    })?;

    Ok(())
}

/// Pointer events are mouse events; coordinates are relative to the viewport
fn client_position(event: &Event) -> Option<(f32, f32)> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some((mouse.client_x() as f32, mouse.client_y() as f32))
}

fn listen<F>(target: &EventTarget, name: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Run a frame on every display refresh, forever
pub fn start_animation_loop(viewer: Shared) -> Result<()> {
    let window = viewer.borrow().view.dom.window.clone();

    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();
    let loop_window = window.clone();

    *callback.borrow_mut() = Some(Closure::new(move || {
        if let Err(err) = viewer.borrow_mut().frame() {
            log::error!("frame failed: {err}");
        }
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) = request_frame(&loop_window, callback) {
                log::error!("could not schedule next frame: {err}");
            }
        }
    }));

    if let Some(callback) = callback.borrow().as_ref() {
        request_frame(&window, callback)?;
    }
    Ok(())
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut()>) -> Result<i32> {
    Ok(window.request_animation_frame(callback.as_ref().unchecked_ref())?)
}
