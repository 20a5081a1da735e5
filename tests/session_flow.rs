use std::time::Duration;

use wordcloud::{
    AdminConsole, CanvasSize, CloudConfig, CloudRenderer, DisplaySession, LocalChannel,
    Respondent, SpiralLayout, SvgOptions, ThreadedLayout,
};

const TIMEOUT: Duration = Duration::from_secs(30);

fn display(channel: &LocalChannel) -> DisplaySession {
    let cfg = CloudConfig {
        seed: Some(11),
        ..CloudConfig::default()
    };
    let renderer = CloudRenderer::new(
        cfg,
        CanvasSize::default(),
        ThreadedLayout::new(SpiralLayout::default()),
    )
    .unwrap();
    DisplaySession::connect(channel, renderer).unwrap()
}

#[test]
fn admin_respondents_and_display_share_one_channel() {
    let channel = LocalChannel::new();
    let mut admin = AdminConsole::connect(&channel).unwrap();
    let mut display = display(&channel);
    let mut people: Vec<Respondent> = (0..5)
        .map(|_| Respondent::connect(&channel).unwrap())
        .collect();
    assert_eq!(channel.connected_clients(), 7);

    admin.publish_question("Favourite colour?").unwrap();
    for (person, word) in people.iter_mut().zip(["red", "blue", "red", "red", "green"]) {
        person.submit(word).unwrap();
    }

    assert_eq!(display.pump(), 6);
    assert!(display.renderer_mut().wait(TIMEOUT) || display.renderer().scene().is_some());

    let renderer = display.renderer();
    assert_eq!(renderer.question(), Some("Favourite colour?"));
    assert_eq!(renderer.submissions().len(), 5);
    let freqs = renderer.frequencies();
    assert_eq!(freqs.get("red"), Some(3));
    assert_eq!(freqs.get("blue"), Some(1));

    let scene = renderer.scene().unwrap();
    assert!(!scene.is_empty());
    assert_eq!(scene.node("red").unwrap().font_size, 72.0);
}

#[test]
fn new_question_resets_display_and_reopens_respondents() {
    let channel = LocalChannel::new();
    let mut admin = AdminConsole::connect(&channel).unwrap();
    let mut display = display(&channel);
    let mut person = Respondent::connect(&channel).unwrap();

    admin.publish_question("Q1").unwrap();
    person.submit("first").unwrap();
    display.pump();
    display.renderer_mut().wait(TIMEOUT);
    assert!(display.renderer().scene().is_some());

    admin.publish_question("Q2").unwrap();
    display.pump();
    assert!(display.renderer().state().is_waiting());
    assert!(display.renderer().submissions().is_empty());
    assert!(
        display
            .renderer()
            .to_svg(SvgOptions::default())
            .contains("Waiting for responses")
    );

    person.sync();
    assert_eq!(person.question(), Some("Q2"));
    assert!(person.can_submit());
    person.submit("second").unwrap();
    display.pump();
    display.renderer_mut().wait(TIMEOUT);
    let scene = display.renderer().scene().unwrap();
    assert!(scene.node("first").is_none());
    assert_eq!(scene.len(), 1);

    assert_eq!(admin.sent().len(), 2);
}

#[test]
fn responses_are_forwarded_as_typed() {
    let channel = LocalChannel::new();
    let mut admin = AdminConsole::connect(&channel).unwrap();
    let mut display = display(&channel);
    let mut a = Respondent::connect(&channel).unwrap();
    let mut b = Respondent::connect(&channel).unwrap();

    admin.publish_question("Pets?").unwrap();
    a.submit("cat").unwrap();
    b.submit(" cat").unwrap();
    display.pump();

    // Exact-match aggregation: surrounding whitespace makes a distinct word.
    let freqs = display.renderer().frequencies();
    assert_eq!(freqs.len(), 2);
    assert_eq!(freqs.get("cat"), Some(1));
    assert_eq!(freqs.get(" cat"), Some(1));
}

#[test]
fn closing_roles_disconnects_them() {
    let channel = LocalChannel::new();
    let admin = AdminConsole::connect(&channel).unwrap();
    let person = Respondent::connect(&channel).unwrap();
    let display = display(&channel);
    assert_eq!(channel.connected_clients(), 3);

    admin.close();
    person.close();
    let renderer = display.close();
    assert_eq!(channel.connected_clients(), 0);
    assert!(renderer.state().is_waiting());
}
