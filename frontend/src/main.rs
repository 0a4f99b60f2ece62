use web_sys::Element;
use yew::prelude::*;

mod api;
mod chartjs;
mod charts;
mod config;
mod dashboard;
mod error;
mod format;
mod icons;
mod pagination;
mod theme;
mod upload;
mod validation;

use config::AppConfig;

const DASHBOARD_ROOT: &str = "dashboard-app";
const UPLOAD_ROOT: &str = "upload-app";

#[derive(Clone, Copy, PartialEq)]
enum View {
    Dashboard,
    Upload,
}

#[derive(Properties, PartialEq)]
struct RootProps {
    view: View,
    config: AppConfig,
}

#[function_component(Root)]
fn root(props: &RootProps) -> Html {
    let content = match props.view {
        View::Dashboard => html! { <dashboard::Dashboard /> },
        View::Upload => html! { <upload::Upload /> },
    };

    html! {
        <ContextProvider<AppConfig> context={props.config.clone()}>
            { content }
        </ContextProvider<AppConfig>>
    }
}

fn mount_point(id: &str) -> Option<Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

    let config = config::load_config();
    let mut mounted = false;

    if let Some(element) = mount_point(DASHBOARD_ROOT) {
        if let Err(err) = chartjs::apply_defaults() {
            log::warn!("charts unavailable: {}", err);
        }
        yew::Renderer::<Root>::with_root_and_props(
            element,
            RootProps {
                view: View::Dashboard,
                config: config.clone(),
            },
        )
        .render();
        log::info!("dashboard mounted");
        mounted = true;
    }

    if let Some(element) = mount_point(UPLOAD_ROOT) {
        yew::Renderer::<Root>::with_root_and_props(
            element,
            RootProps {
                view: View::Upload,
                config,
            },
        )
        .render();
        log::info!("upload form mounted");
        mounted = true;
    }

    if !mounted {
        log::warn!("no #{} or #{} element on this page", DASHBOARD_ROOT, UPLOAD_ROOT);
    }
}
