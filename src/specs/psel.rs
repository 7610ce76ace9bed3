// src/specs/psel.rs
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use crate::config::consts::*;
use crate::config::options::ScrapeOptions;
use crate::core::DomNode;
use crate::core::sanitize::{is_all_digits, non_empty, parse_odds};
use crate::data::{OddsEntry, RawEvent};
use crate::normalize::normalize_label;

/// Diagnostics for one document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Containers located.
    pub found: usize,
    /// Containers that produced a usable event.
    pub extracted: usize,
    /// Containers whose extraction faulted.
    pub failed: usize,
    /// Containers skipped as repeats of an earlier link.
    pub duplicates: usize,
}

/// Every `psel-event-main` / `psel-event-live` element, document order.
pub fn locate_events<N: DomNode>(root: &N) -> Vec<N> {
    root.find_all_by_tag(&EVENT_TAGS)
}

/// Read one container. `None` when it lacks an opponent or a valid price.
pub fn extract_event<N: DomNode>(node: &N) -> Option<RawEvent> {
    let mut ev = RawEvent::default();

    if let Some(href) = node
        .find_first_by_class(Some(LINK_TAG), LINK_CLASS)
        .and_then(|a| a.attr_value("href"))
    {
        ev.external_id = external_id(&href);
        ev.url = Some(href);
    }

    ev.competition = node
        .find_first_by_class(Some(COMPETITION_TAG), COMPETITION_CLASS)
        .map(|el| el.trimmed_text());

    // Cards without a live timer carry the kick-off in the info block.
    ev.date_time_text = node
        .find_first_by_class(Some(TIMER_TAG), TIMER_CLASS)
        .and_then(|el| non_empty(&el.trimmed_text()))
        .or_else(|| {
            node.find_first_by_class(None, DATE_INFO_CLASS)
                .and_then(|el| non_empty(&el.trimmed_text()))
        });

    ev.opponents = node
        .find_all_by_class(OPPONENT_CLASS)
        .iter()
        .filter_map(|el| non_empty(&el.trimmed_text()))
        .collect();

    for outcome in node.find_all_by_tag(&[OUTCOME_TAG]) {
        let (Some(label_el), Some(data_el)) = (
            outcome.find_first_by_class(None, OUTCOME_LABEL_CLASS),
            outcome.find_first_by_class(None, OUTCOME_DATA_CLASS),
        ) else {
            continue;
        };
        let label = normalize_label(&label_el.trimmed_text());
        let data = data_el.trimmed_text();
        match parse_odds(&data) {
            Some(value) if !label.is_empty() => ev.odds.push(OddsEntry { label, value }),
            _ => logd!("dropping outcome {label:?} = {data:?}"),
        }
    }

    if !ev.is_usable() {
        logd!(
            "discarding event {:?}: {} opponent(s), {} price(s)",
            ev.url,
            ev.opponents.len(),
            ev.odds.len()
        );
        return None;
    }
    Some(ev)
}

/// Second-to-last path segment, kept only when it is all digits.
/// `/paris-football/x/3300308/match-name` → `3300308`.
pub fn external_id(href: &str) -> Option<String> {
    let parts: Vec<&str> = href.split('/').collect();
    if parts.len() < 2 {
        return None;
    }
    let candidate = parts[parts.len() - 2];
    is_all_digits(candidate).then(|| s!(candidate))
}

/// Locate and extract every event in a document. One container faulting
/// costs only that container.
pub fn extract_all<N: DomNode>(root: &N, opts: &ScrapeOptions) -> (Vec<RawEvent>, ExtractReport) {
    let nodes = locate_events(root);
    let mut report = ExtractReport { found: nodes.len(), ..Default::default() };
    let mut events = Vec::with_capacity(nodes.len());
    let mut seen_urls: HashSet<String> = HashSet::new();

    logf!("found {} event container(s)", report.found);

    for (idx, node) in nodes.iter().enumerate() {
        match panic::catch_unwind(AssertUnwindSafe(|| extract_event(node))) {
            Ok(Some(ev)) => {
                if opts.dedupe_urls {
                    if let Some(url) = &ev.url {
                        if !seen_urls.insert(url.clone()) {
                            logd!("event {}: repeat of {url}, skipped", idx + 1);
                            report.duplicates += 1;
                            continue;
                        }
                    }
                }
                logd!(
                    "event {}: {} - {} price(s)",
                    idx + 1,
                    ev.opponents.iter().take(2).cloned().collect::<Vec<_>>().join(" vs "),
                    ev.odds.len()
                );
                report.extracted += 1;
                events.push(ev);
            }
            Ok(None) => {}
            Err(cause) => {
                report.failed += 1;
                loge!("event {}: extraction failed: {}", idx + 1, panic_message(&*cause));
            }
        }
    }

    logf!(
        "extracted {}/{} event(s) ({} failed)",
        report.extracted,
        report.found,
        report.failed
    );
    (events, report)
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        s!(*s)
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        s!("unknown fault")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HtmlDoc;

    fn card(tag: &str, href: &str, comp: &str, timer: &str, teams: &[&str], odds: &[(&str, &str)]) -> String {
        let teams: String = teams
            .iter()
            .map(|t| format!(r#"<span class="psel-opponent__name">{t}</span>"#))
            .collect();
        let odds: String = odds
            .iter()
            .map(|(l, v)| {
                format!(
                    r#"<psel-outcome><button><span class="psel-outcome__label">{l}</span><span class="psel-outcome__data">{v}</span></button></psel-outcome>"#
                )
            })
            .collect();
        format!(
            r#"<{tag} class="psel-event"><a class="psel-event__link" href="{href}"></a>
               <p class="psel-event-info__competition">{comp}</p>
               <time class="psel-timer">{timer}</time>{teams}{odds}</{tag}>"#
        )
    }

    fn first_event(html: &str) -> Option<RawEvent> {
        let doc = HtmlDoc::parse(html);
        let nodes = locate_events(&doc.root());
        nodes.first().and_then(extract_event)
    }

    #[test]
    fn extracts_all_fields() {
        let html = card(
            "psel-event-main",
            "/paris-football/france/3300308/psg-lens",
            " Ligue 1 ",
            " 12/01 21h00 ",
            &["PSG", "Lens"],
            &[("PSG", "1,45"), ("N", "4,20"), ("Lens", "6,50")],
        );
        let ev = first_event(&html).unwrap();
        assert_eq!(ev.opponents, ["PSG", "Lens"]);
        assert_eq!(ev.competition.as_deref(), Some("Ligue 1"));
        assert_eq!(ev.date_time_text.as_deref(), Some("12/01 21h00"));
        assert_eq!(ev.url.as_deref(), Some("/paris-football/france/3300308/psg-lens"));
        assert_eq!(ev.external_id.as_deref(), Some("3300308"));
        let labels: Vec<&str> = ev.odds.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["PSG", "Nul", "Lens"]);
        assert_eq!(ev.odds[1].value, 4.2);
    }

    #[test]
    fn bad_prices_are_dropped_individually() {
        let html = card(
            "psel-event-live",
            "/x/1/y",
            "ATP",
            "En direct",
            &["Nadal", "Federer"],
            &[("Nadal", "abc"), ("Federer", "1,90"), ("Nul", "0"), ("Other", "-1,5")],
        );
        let ev = first_event(&html).unwrap();
        assert_eq!(ev.odds, vec![OddsEntry::new("Federer", 1.9)]);
    }

    #[test]
    fn no_valid_price_discards_event() {
        let html = card("psel-event-main", "/x/1/y", "ATP", "", &["A", "B"], &[("A", "-")]);
        assert!(first_event(&html).is_none());
    }

    #[test]
    fn no_opponent_discards_event() {
        let html = card("psel-event-main", "/x/1/y", "ATP", "", &["  "], &[("A", "1,5")]);
        assert!(first_event(&html).is_none());
    }

    #[test]
    fn single_opponent_survives_extraction() {
        let html = card("psel-event-main", "/x/1/y", "Golf", "", &["OnlyOneTeam"], &[("OnlyOneTeam", "2,0")]);
        let ev = first_event(&html).unwrap();
        assert_eq!(ev.opponents, ["OnlyOneTeam"]);
    }

    #[test]
    fn blank_timer_is_absent() {
        let html = card("psel-event-main", "/x/1/y", "ATP", "   ", &["A", "B"], &[("A", "1,5")]);
        assert_eq!(first_event(&html).unwrap().date_time_text, None);
    }

    #[test]
    fn info_date_stands_in_for_missing_timer() {
        let html = r#"<psel-event-main>
            <p class="psel-event-info__competition">Ligue 1</p>
            <span class="psel-event-info__date">Demain 20h00</span>
            <span class="psel-opponent__name">A</span><span class="psel-opponent__name">B</span>
            <psel-outcome><span class="psel-outcome__label">A</span><span class="psel-outcome__data">1,5</span></psel-outcome>
        </psel-event-main>"#;
        let ev = first_event(html).unwrap();
        assert_eq!(ev.date_time_text.as_deref(), Some("Demain 20h00"));

        let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(22, 0, 0).unwrap();
        let mut agg = crate::aggregate::Aggregator::new(now);
        assert_eq!(agg.add(&ev).as_deref(), Some("A vs B - 2024-01-11 20:00:00 - Ligue 1"));
    }

    #[test]
    fn timer_wins_over_info_date_unless_blank() {
        let with_timer = card("psel-event-main", "/x/1/y", "C", "21h00", &["A", "B"], &[("A", "1,5")])
            .replace("</psel-event-main>", r#"<span class="psel-event-info__date">13/01 18h00</span></psel-event-main>"#);
        assert_eq!(first_event(&with_timer).unwrap().date_time_text.as_deref(), Some("21h00"));

        let blank_timer = card("psel-event-main", "/x/1/y", "C", "  ", &["A", "B"], &[("A", "1,5")])
            .replace("</psel-event-main>", r#"<span class="psel-event-info__date">13/01 18h00</span></psel-event-main>"#);
        assert_eq!(first_event(&blank_timer).unwrap().date_time_text.as_deref(), Some("13/01 18h00"));
    }

    #[test]
    fn inner_spacing_of_names_is_kept() {
        let html = card("psel-event-main", "/x/1/y", "C", "21h00", &[" Paris  SG ", "Lens"], &[("Lens", "2,0")]);
        assert_eq!(first_event(&html).unwrap().opponents, ["Paris  SG", "Lens"]);
    }

    #[test]
    fn missing_link_and_competition_are_non_fatal() {
        let html = r#"<psel-event-main>
            <span class="psel-opponent__name">A</span><span class="psel-opponent__name">B</span>
            <psel-outcome><span class="psel-outcome__label">A</span><span class="psel-outcome__data">1,5</span></psel-outcome>
            <psel-outcome><span class="psel-outcome__data">9,9</span></psel-outcome>
        </psel-event-main>"#;
        let ev = first_event(html).unwrap();
        assert_eq!(ev.url, None);
        assert_eq!(ev.external_id, None);
        assert_eq!(ev.competition, None);
        assert_eq!(ev.odds.len(), 1);
    }

    #[test]
    fn id_from_second_to_last_segment() {
        assert_eq!(external_id("/paris-football/x/3300308/match-name").as_deref(), Some("3300308"));
        assert_eq!(external_id("/paris-football/x/abc/match-name"), None);
        assert_eq!(external_id("3300308"), None);
        assert_eq!(external_id("/3300308/"), Some(s!("3300308")));
    }

    #[test]
    fn locator_keeps_document_order_across_both_kinds() {
        let html = format!(
            "<div>{}{}</div><psel-event class=\"psel-event\"></psel-event>",
            card("psel-event-live", "/a/1/x", "C", "", &["L1", "L2"], &[("L1", "1,1")]),
            card("psel-event-main", "/a/2/x", "C", "", &["M1", "M2"], &[("M1", "1,1")]),
        );
        let doc = HtmlDoc::parse(&html);
        let (events, report) = extract_all(&doc.root(), &ScrapeOptions::default());
        assert_eq!(report.found, 2);
        assert_eq!(events[0].opponents[0], "L1");
        assert_eq!(events[1].opponents[0], "M1");
    }

    #[test]
    fn empty_document_is_not_an_error() {
        let doc = HtmlDoc::parse("<html><body><p>rien</p></body></html>");
        let (events, report) = extract_all(&doc.root(), &ScrapeOptions::default());
        assert!(events.is_empty());
        assert_eq!(report, ExtractReport::default());
    }

    #[test]
    fn dedupe_skips_repeated_links_only_when_enabled() {
        let one = card("psel-event-main", "/a/7/x", "C", "", &["A", "B"], &[("A", "1,1")]);
        let html = format!("{one}{one}");
        let doc = HtmlDoc::parse(&html);

        let (events, report) = extract_all(&doc.root(), &ScrapeOptions::default());
        assert_eq!((events.len(), report.duplicates), (2, 0));

        let (events, report) = extract_all(&doc.root(), &ScrapeOptions { dedupe_urls: true });
        assert_eq!((events.len(), report.duplicates, report.extracted), (1, 1, 1));
    }

    /// In-memory tree whose nodes can be rigged to fault.
    #[derive(Clone)]
    struct FakeNode {
        tag: &'static str,
        classes: Vec<&'static str>,
        text: &'static str,
        href: Option<&'static str>,
        boom: bool,
        children: Vec<FakeNode>,
    }

    impl FakeNode {
        fn el(tag: &'static str, class: &'static str, text: &'static str) -> Self {
            Self { tag, classes: vec![class], text, href: None, boom: false, children: vec![] }
        }

        fn has_class(&self, class: &str) -> bool {
            self.classes.iter().any(|c| *c == class)
        }

        fn walk(&self) -> Vec<FakeNode> {
            let mut out = Vec::new();
            for c in &self.children {
                out.push(c.clone());
                out.extend(c.walk());
            }
            out
        }
    }

    impl DomNode for FakeNode {
        fn find_all_by_tag(&self, tags: &[&str]) -> Vec<Self> {
            self.walk().into_iter().filter(|n| tags.contains(&n.tag)).collect()
        }
        fn find_first_by_class(&self, tag: Option<&str>, class: &str) -> Option<Self> {
            if self.boom {
                panic!("broken card");
            }
            self.walk()
                .into_iter()
                .find(|n| tag.is_none_or(|t| t == n.tag) && n.has_class(class))
        }
        fn find_all_by_class(&self, class: &str) -> Vec<Self> {
            self.walk().into_iter().filter(|n| n.has_class(class)).collect()
        }
        fn trimmed_text(&self) -> String {
            s!(self.text.trim())
        }
        fn attr_value(&self, name: &str) -> Option<String> {
            if name == "href" { self.href.map(str::to_string) } else { None }
        }
    }

    fn fake_event(boom: bool) -> FakeNode {
        let mut outcome = FakeNode::el(OUTCOME_TAG, "", "");
        outcome.children = vec![
            FakeNode::el("span", OUTCOME_LABEL_CLASS, "A"),
            FakeNode::el("span", OUTCOME_DATA_CLASS, "1,5"),
        ];
        let mut ev = FakeNode::el("psel-event-main", "psel-event", "");
        ev.boom = boom;
        ev.children = vec![
            FakeNode::el("span", OPPONENT_CLASS, "A"),
            FakeNode::el("span", OPPONENT_CLASS, "B"),
            outcome,
        ];
        ev
    }

    #[test]
    fn faulting_container_is_isolated() {
        let mut root = FakeNode::el("html", "", "");
        root.children = vec![fake_event(false), fake_event(true), fake_event(false)];

        let (events, report) = extract_all(&root, &ScrapeOptions::default());
        assert_eq!(report.found, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.extracted, 2);
        assert_eq!(events.len(), 2);
    }
}
