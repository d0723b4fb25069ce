use std::sync::Arc;

use stylemark::{
    parse_style_code, ColorProfile, Delimiters, MockEnv, Renderer, TagRegistry, RESET,
};

fn renderer() -> Renderer {
    Renderer::new(Arc::new(TagRegistry::with_defaults()))
}

#[test]
fn test_scenario_across_profiles() {
    let input = "{{|red:blue:B|}}Hi{{|-|}}";
    let r = renderer();

    assert_eq!(
        r.to_ansi_with_profile(input, ColorProfile::TrueColor),
        "\x1b[38;2;255;0;0;48;2;0;0;255;1mHi\x1b[0m"
    );
    assert_eq!(
        r.to_ansi_with_profile(input, ColorProfile::Ansi256),
        "\x1b[38;5;1;48;5;4;1mHi\x1b[0m"
    );
    assert_eq!(
        r.to_ansi_with_profile(input, ColorProfile::Ansi16),
        "\x1b[31;44;1mHi\x1b[0m"
    );
    assert_eq!(r.to_ansi_with_profile(input, ColorProfile::Ascii), "Hi");
    assert_eq!(r.clone().with_terminal(false).to_ansi(input), "Hi");
}

#[test]
fn test_cyan_round_trip() {
    let r = renderer();
    assert_eq!(
        r.to_ansi_with_profile("{{|cyan|}}", ColorProfile::Ansi16),
        "\x1b[36m"
    );
    assert_eq!(
        r.to_ansi_with_profile("{{|cyan|}}", ColorProfile::TrueColor),
        "\x1b[38;2;0;255;255m"
    );
}

#[test]
fn test_reset_is_independent_of_prior_state() {
    let r = renderer();
    for prefix in ["", "{{|red|}}", "{{|::BUI|}}", "{{|#123456:white:R|}}"] {
        let input = format!("{}{{{{|-|}}}}", prefix);
        let out = r.to_ansi_with_profile(&input, ColorProfile::Ansi16);
        assert!(out.ends_with(RESET), "{:?}", out);
    }
    assert!(parse_style_code("-").is_reset());
    assert!(parse_style_code(" - ").is_reset());
}

#[test]
fn test_plain_text_passes_through() {
    let r = renderer();
    let text = "nothing to see [here] | {not a tag}";
    assert_eq!(r.strip(text), text);
    assert_eq!(r.clone().with_terminal(false).to_ansi(text), text);
    assert_eq!(r.to_ansi_with_profile(text, ColorProfile::Ascii), text);
    assert_eq!(r.to_ansi_with_profile(text, ColorProfile::TrueColor), text);
}

#[test]
fn test_unknown_names_degrade_to_plain() {
    let r = renderer().with_profile(ColorProfile::Ansi16);
    assert_eq!(r.to_ansi("{{_nosuch_}}a{{|nocolor|}}b"), "ab");
    // The known field survives
    assert_eq!(r.to_ansi("{{|nocolor:blue|}}x"), "\x1b[44mx");
}

#[test]
fn test_high_intensity_selects_bright_variant() {
    let r = renderer();
    assert_eq!(
        r.to_ansi_with_profile("{{|red::H|}}x", ColorProfile::Ansi16),
        "\x1b[91mx"
    );
    assert_eq!(
        r.to_ansi_with_profile("{{|3:4:H|}}x", ColorProfile::Ansi256),
        "\x1b[38;5;11;48;5;12mx"
    );
}

#[test]
fn test_builtin_tags_render() {
    let r = renderer().with_profile(ColorProfile::Ansi16);
    assert_eq!(r.to_ansi("{{_warn_}}careful"), "\x1b[0m\x1b[33mcareful");
    assert_eq!(r.to_ansi("{{_url_}}x"), "\x1b[0m\x1b[36;4mx");
    assert_eq!(r.to_ansi("{{_F_Red_}}x"), "\x1b[31mx");
    assert_eq!(r.to_ansi("{{_B_Red_}}x"), "\x1b[41mx");
}

#[test]
fn test_registry_changes_are_visible_to_renderers_sharing_it() {
    let registry = Arc::new(TagRegistry::with_defaults());
    let live = Renderer::new(Arc::clone(&registry)).with_profile(ColorProfile::Ansi16);
    let other = Renderer::new(Arc::clone(&registry))
        .with_profile(ColorProfile::Ansi16)
        .with_delimiters(Delimiters::new("<", ">", "[[", "]]"));

    live.register_tag("accent", "magenta::U");
    assert_eq!(live.to_ansi("{{_accent_}}x"), "\x1b[35;4mx");
    assert_eq!(other.to_ansi("<accent>x"), "\x1b[35;4mx");

    registry.reset_to_defaults();
    assert_eq!(live.to_ansi("{{_accent_}}x"), "x");
}

#[test]
fn test_environment_driven_renderer() {
    let registry = Arc::new(TagRegistry::with_defaults());

    let env = MockEnv::new()
        .with_var("TERM", "xterm")
        .with_var("CLICOLOR_FORCE", "1");
    let r = Renderer::from_env(Arc::clone(&registry), &env);
    assert_eq!(r.profile(), ColorProfile::Ansi16);
    assert_eq!(r.to_ansi("{{|red|}}x"), "\x1b[31mx");

    let env = MockEnv::new()
        .with_var("COLORTERM", "256color")
        .with_var("CLICOLOR_FORCE", "1");
    let r = Renderer::from_env(Arc::clone(&registry), &env);
    assert_eq!(r.to_ansi("{{|red|}}x"), "\x1b[38;5;1mx");

    let env = MockEnv::new().with_var("TERM", "dumb").with_var("CLICOLOR_FORCE", "1");
    let r = Renderer::from_env(registry, &env);
    assert_eq!(r.to_ansi("{{|red|}}x"), "x");
}

#[test]
fn test_removed_tags_never_join_surrounding_text() {
    let r = renderer();
    let input = "a{{_{{_nosuch_}}b_}}c";
    for profile in [ColorProfile::Ansi16, ColorProfile::Ansi256, ColorProfile::TrueColor] {
        let rendered = r.to_ansi_with_profile(input, profile);
        // `{{_b_}}` is the built-in blue; it only exists once the inner tag is gone
        assert_eq!(rendered, "a{{_b_}}c");
        assert_eq!(r.strip(&rendered), r.strip(input));
    }
}

#[test]
fn test_display_markup() {
    let r = renderer();
    assert_eq!(
        r.to_display_markup("{{_error_}}[WARN] {{|::B|}}disk{{|-|}}"),
        "[-:-:-][maroon][WARN[] [::b]disk[-:-:-]"
    );
}

#[test]
fn test_concurrent_render_and_theme_load() {
    let registry = Arc::new(TagRegistry::with_defaults());
    let renderer = Renderer::new(Arc::clone(&registry)).with_profile(ColorProfile::Ansi16);
    renderer.load_theme([("A", "{{|red|}}"), ("B", "{{|red|}}")], None);

    let writer = {
        let renderer = renderer.clone();
        std::thread::spawn(move || {
            for round in 0..50 {
                let code = if round % 2 == 0 { "{{|green|}}" } else { "{{|red|}}" };
                renderer.load_theme([("A", code), ("B", code)], None);
            }
        })
    };

    for _ in 0..200 {
        let out = renderer.to_ansi("{{_Theme_A_}}x");
        assert!(out == "\x1b[31mx" || out == "\x1b[32mx", "torn value: {:?}", out);
        let snapshot = registry.snapshot();
        let a = snapshot.iter().find(|(k, _)| k == "theme_a").map(|(_, v)| v);
        let b = snapshot.iter().find(|(k, _)| k == "theme_b").map(|(_, v)| v);
        assert_eq!(a, b, "half-applied theme batch");
    }
    writer.join().unwrap();
}
