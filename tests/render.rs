use std::cell::RefCell;

use mdview::{
    Color, Container, MarkdownView, NavigateError, Orientation, TapOutcome, Theme, View,
    markdown_to_view, markdown_to_view_with_theme,
};

const README: &str = "\
---
title: sample
---

# Project

Intro with a [link](/docs) and `code`.

> A quote
> with two lines.

1. first
2. second
   - nested

```
let x = 1;
let y = 2;
```

---

![diagram](img/arch.svg)
";

fn container(view: &View) -> &Container {
    match view {
        View::Container(c) => c,
        other => panic!("expected container, got {other:?}"),
    }
}

#[test]
fn renders_a_full_document() {
    let rendered =
        markdown_to_view_with_theme(README, &Theme::light(), Some("https://example.com"));
    let kinds: Vec<&str> = rendered
        .content
        .children
        .iter()
        .map(|view| match view {
            View::Text(_) => "text",
            View::Image(_) => "image",
            View::Box(_) => "box",
            View::Frame(_) => "frame",
            View::Container(c) if c.orientation == Orientation::Horizontal => "hstack",
            View::Container(_) => "vstack",
        })
        .collect();
    assert_eq!(
        kinds,
        [
            "vstack", "text", "hstack", "hstack", "hstack", "frame", "box", "text", "image"
        ]
    );

    let View::Image(image) = &rendered.content.children[8] else {
        unreachable!();
    };
    assert_eq!(image.source, "https://example.com/img/arch.svg");
    assert!(image.vector);
}

#[test]
fn document_opening_with_a_rule_keeps_every_block() {
    let rendered = markdown_to_view("---\n\nIntro.\n\n---\n\nBody.");
    assert_eq!(
        rendered.outline(),
        "box h=2 #D8D8D8\ntext \"Intro.\"\nbox h=2 #D8D8D8\ntext \"Body.\"\n"
    );
}

#[test]
fn outline_is_deterministic() {
    let rendered = markdown_to_view("# T\n\n- a");
    assert_eq!(
        rendered.outline(),
        "vstack\n  text \"T\"\n  box h=1 #D8D8D8\n\
         hstack margin-left=10\n  box w=4 h=4 #24292E\n  vstack\n    text \"a\"\n"
    );
}

#[test]
fn json_output_tags_views_and_colors() {
    let rendered = markdown_to_view("see [a](https://a)");
    let json = serde_json::to_value(&rendered).unwrap();
    assert_eq!(json["background"], "#FFFFFF");
    let first = &json["content"]["children"][0];
    assert_eq!(first["kind"], "text");
    assert_eq!(first["on_tap"][0]["url"], "https://a");
    assert_eq!(first["spans"][1]["foreground_color"], "#0366D6");
}

#[test]
fn custom_theme_file_applies() {
    let theme = Theme::from_toml_str(
        "background_color = \"#000000\"\n[quote]\nborder_size = 0.0\nbackground_color = \"#111111\"\n",
    )
    .unwrap();
    let rendered = markdown_to_view_with_theme("> q", &theme, None);
    assert_eq!(rendered.background, Color::rgb(0, 0, 0));
    let quote = container(&rendered.content.children[0]);
    assert_eq!(quote.orientation, Orientation::Vertical);
    assert_eq!(quote.background, Some(Color::rgb(0x11, 0x11, 0x11)));
}

#[test]
fn view_taps_navigate_through_the_host() {
    let mut view = MarkdownView::new("Only [one](page.html) link.");
    view.set_relative_url_host(Some("https://example.com/base/".to_string()));
    let opened = RefCell::new(Vec::new());
    let taps = view.rendered().link_taps();
    assert_eq!(taps.len(), 1);

    let navigator = |url: &str| -> Result<(), NavigateError> {
        opened.borrow_mut().push(url.to_string());
        Ok(())
    };
    let outcome = taps[0].activate(&navigator, &mdview::CancelPrompt);
    assert_eq!(
        outcome,
        TapOutcome::Navigated("https://example.com/base/page.html".to_string())
    );
    assert_eq!(*opened.borrow(), ["https://example.com/base/page.html"]);
}
