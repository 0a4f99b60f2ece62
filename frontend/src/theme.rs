use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MutationObserver, MutationObserverInit, MutationRecord};
use yew::prelude::*;

#[derive(Default, PartialEq)]
struct Generation(u32);

impl Reducible for Generation {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Generation(self.0.wrapping_add(1)))
    }
}

type ObserverCallback = Closure<dyn FnMut(Array, MutationObserver)>;

fn observe_body_class(
    on_change: impl Fn() + 'static,
) -> Result<(MutationObserver, ObserverCallback), JsValue> {
    let body = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let callback = Closure::wrap(Box::new(move |records: Array, _: MutationObserver| {
        for record in records.iter() {
            let Ok(record) = record.dyn_into::<MutationRecord>() else {
                continue;
            };
            if record.attribute_name().as_deref() == Some("class") {
                on_change();
            }
        }
    }) as Box<dyn FnMut(Array, MutationObserver)>);

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_attributes(true);
    options.set_attribute_filter(&Array::of1(&JsValue::from_str("class")));
    observer.observe_with_options(&body, &options)?;

    Ok((observer, callback))
}

/// Counter bumped `settle_ms` after every change of the body's `class`
/// attribute (the theme toggle). Components key their data loads on it.
#[hook]
pub fn use_theme_generation(settle_ms: u32) -> u32 {
    let generation = use_reducer(Generation::default);

    {
        let dispatcher = generation.dispatcher();
        use_effect_with_deps(
            move |settle_ms| {
                let settle_ms = *settle_ms;
                let observed = observe_body_class(move || {
                    let dispatcher = dispatcher.clone();
                    log::debug!("theme changed, reloading in {}ms", settle_ms);
                    Timeout::new(settle_ms, move || dispatcher.dispatch(())).forget();
                });
                let observed = match observed {
                    Ok(observed) => Some(observed),
                    Err(err) => {
                        log::warn!("theme observer unavailable: {:?}", err);
                        None
                    }
                };
                move || {
                    if let Some((observer, _callback)) = observed {
                        observer.disconnect();
                    }
                }
            },
            settle_ms,
        );
    }

    generation.0
}
