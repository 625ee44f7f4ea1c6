#![forbid(unsafe_code)]

//! Drives a voting counter through a few frames and prints each render.
//!
//! `FALSEWORK_SCHEDULING=immediate` renders inside each click instead of
//! on the next frame. `RUST_LOG=falsework=debug` shows the lifecycle.

use std::process::ExitCode;

use falsework::dom::SelectorList;
use falsework::prelude::*;
use tracing_subscriber::EnvFilter;

struct VoteCounter {
    up: Prop<u32>,
    down: Prop<u32>,
    tally: Binding<String>,
}

impl Component for VoteCounter {
    const IDENTIFIER: &'static str = "VoteCounter";

    fn init() -> Self {
        let up = Prop::new("up", 0);
        let down = Prop::new("down", 0);
        let tally = bind_mapped2(&up, &down, |u, d| format!("up={u}, down={d}"));
        Self { up, down, tally }
    }

    fn shadow_root_init() -> ShadowRootInit {
        ShadowRootInit::open()
    }

    fn declare(decl: &mut Declarations<Self>) {
        decl.reactive(|c| &c.up)
            .reactive(|c| &c.down)
            .capture::<Button>("click", "button.vote-up, button.vote-down", |c, hit| {
                if hit.target().has_class("vote-up") {
                    c.up.update(|n| *n += 1);
                } else {
                    c.down.update(|n| *n += 1);
                }
            });
    }

    fn template(&self) -> Option<Markup> {
        Some(
            html::el("div")
                .child(html::el("button").class("vote-up").text("+1"))
                .child(html::el("button").class("vote-down").text("-1"))
                .child(html::el("output").text(self.tally.get())),
        )
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = HostConfig::from_env()?;
    let host = Host::with_config(config);
    let name = host.define::<VoteCounter>()?;
    let counter = host.construct::<VoteCounter>()?;
    host.document().root().append_child(counter.host())?;
    println!("defined <{name}> as {counter}");

    let root = counter
        .host()
        .shadow_root()
        .ok_or("voting counter scope is closed")?;
    let up = SelectorList::parse("button.vote-up")?;
    let down = SelectorList::parse("button.vote-down")?;
    let click = |list: &SelectorList| {
        if let Some(button) = root.query_selector(list) {
            button.click();
        }
    };

    let script: [&[&SelectorList]; 3] = [&[], &[&up, &down], &[&up]];
    for (frame, clicks) in script.iter().enumerate() {
        for &list in *clicks {
            click(list);
        }
        let ran = host.tick();
        println!(
            "frame {frame}: {} click(s), {ran} render(s), total {} -> {}",
            clicks.len(),
            counter.render_count(),
            root.inner_html()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "demo failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
