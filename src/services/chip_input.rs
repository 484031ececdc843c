//! Chip Input State Machine
//!
//! Keyboard, focus and suggestion handling for a multi-value chip input,
//! expressed as a pure transition function:
//!
//! ```text
//! handle(event, now_ms) -> Vec<Effect>
//! ```
//!
//! The machine never touches the DOM, timers or the network. The component
//! shell executes the returned effects (start a timer, issue a fetch, focus
//! the input, notify the host of new chips) and feeds the outcomes back in as
//! events.

use crate::config::SearchConfig;
use crate::services::chips::{Chip, ChipCollection, ChipId, DedupPolicy};
use crate::services::debounce::{DebounceController, DEBOUNCE_MS};
use crate::services::suggestions::{filter_local, MAX_SUGGESTIONS};

/// Grace period between blur and closing the panel, so a pointer press on a
/// suggestion can land first
pub const BLUR_GRACE_MS: u32 = 150;

// ============================================================================
// Configuration
// ============================================================================

/// Where suggestions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionMode {
    /// Filter an in-memory candidate list synchronously
    Local,
    /// Ask a remote lookup, debounced
    Remote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChipInputConfig {
    /// Whether typed text may become a chip (comma / Enter)
    pub allow_free_text: bool,
    pub mode: SuggestionMode,
    pub dedup: DedupPolicy,
    pub max_suggestions: usize,
    pub debounce_ms: u32,
    pub blur_grace_ms: u32,
}

impl ChipInputConfig {
    /// Free-text search terms, no suggestion list
    pub fn search_terms() -> Self {
        Self {
            allow_free_text: true,
            mode: SuggestionMode::Local,
            dedup: DedupPolicy::ById,
            max_suggestions: MAX_SUGGESTIONS,
            debounce_ms: DEBOUNCE_MS,
            blur_grace_ms: BLUR_GRACE_MS,
        }
    }

    /// Categories picked from a known list only
    pub fn categories() -> Self {
        Self {
            allow_free_text: false,
            ..Self::search_terms()
        }
    }

    /// Locations from the city lookup, or typed freely
    pub fn locations() -> Self {
        Self {
            mode: SuggestionMode::Remote,
            dedup: DedupPolicy::ByIdOrValue,
            ..Self::search_terms()
        }
    }

    /// Apply limits and timings from the loaded configuration
    pub fn tuned(mut self, search: &SearchConfig) -> Self {
        self.max_suggestions = search.max_suggestions;
        self.debounce_ms = search.debounce_ms;
        self.blur_grace_ms = search.blur_grace_ms;
        self
    }
}

// ============================================================================
// Events & effects
// ============================================================================

/// Keys the machine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Backspace,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowDown" => Key::ArrowDown,
            "ArrowUp" => Key::ArrowUp,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Backspace" => Key::Backspace,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChipInputEvent {
    Focused,
    Blurred,
    /// Blur grace period is over
    BlurElapsed,
    InputChanged(String),
    Key(Key),
    /// Pointer-down on the suggestion at this index of the filtered list
    SuggestionPressed(usize),
    RemoveChip(ChipId),
    /// Debounce timer for query `seq` fired
    DebounceElapsed(u64),
    SuggestionsLoaded { seq: u64, items: Vec<Chip> },
    /// Local candidate list replaced by the host
    CandidatesChanged(Vec<Chip>),
    /// Chips replaced by the host (reset, preselection)
    SetChips(Vec<Chip>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Look up suggestions for `query` now; report back with `seq`
    FetchSuggestions { seq: u64, query: String },
    /// Start (or restart) the debounce timer for `seq`
    ScheduleQuery { seq: u64, delay_ms: u32 },
    /// Stop the debounce timer
    CancelQuery,
    /// Emit [`ChipInputEvent::BlurElapsed`] after the delay
    ScheduleClose { delay_ms: u32 },
    FocusInput,
    /// Host should take this as the new chip list
    ChipsChanged(Vec<Chip>),
    /// Text in the input box changed
    InputChanged(String),
    /// Suppress the browser's default action for the triggering event
    PreventDefault,
}

/// Whether the suggestion panel is open, and which row is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Closed,
    Open { active: Option<usize> },
}

// ============================================================================
// Machine
// ============================================================================

#[derive(Debug, Clone)]
pub struct ChipInputMachine {
    config: ChipInputConfig,
    chips: ChipCollection,
    input: String,
    interaction: Interaction,
    /// Latest accepted suggestion list, before removing selected chips
    suggestions: Vec<Chip>,
    candidates: Vec<Chip>,
    debounce: DebounceController,
    focused: bool,
}

impl ChipInputMachine {
    pub fn new(config: ChipInputConfig) -> Self {
        Self {
            chips: ChipCollection::new(config.dedup),
            debounce: DebounceController::new(config.debounce_ms),
            config,
            input: String::new(),
            interaction: Interaction::Closed,
            suggestions: Vec::new(),
            candidates: Vec::new(),
            focused: false,
        }
    }

    pub fn config(&self) -> &ChipInputConfig {
        &self.config
    }

    pub fn chips(&self) -> &ChipCollection {
        &self.chips
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_open(&self) -> bool {
        matches!(self.interaction, Interaction::Open { .. })
    }

    pub fn active(&self) -> Option<usize> {
        match self.interaction {
            Interaction::Open { active } => active,
            Interaction::Closed => None,
        }
    }

    /// Suggestions not already selected as chips
    pub fn filtered(&self) -> Vec<Chip> {
        self.suggestions
            .iter()
            .filter(|s| !self.chips.excludes(s))
            .cloned()
            .collect()
    }

    /// Panel is rendered only when open and there is something to show
    pub fn panel_visible(&self) -> bool {
        self.is_open() && self.suggestions.iter().any(|s| !self.chips.excludes(s))
    }

    pub fn handle(&mut self, event: ChipInputEvent, now_ms: u64) -> Vec<Effect> {
        match event {
            ChipInputEvent::Focused => {
                self.focused = true;
                self.interaction = Interaction::Open { active: None };
                self.refresh_now(now_ms)
            }
            ChipInputEvent::Blurred => {
                self.focused = false;
                vec![Effect::ScheduleClose {
                    delay_ms: self.config.blur_grace_ms,
                }]
            }
            ChipInputEvent::BlurElapsed => {
                if self.focused {
                    return Vec::new();
                }
                self.close()
            }
            ChipInputEvent::InputChanged(value) => self.on_input(value, now_ms),
            ChipInputEvent::Key(key) => self.on_key(key, now_ms),
            ChipInputEvent::SuggestionPressed(index) => {
                let mut effects = vec![Effect::PreventDefault];
                if let Some(item) = self.filtered().into_iter().nth(index) {
                    effects.extend(self.commit(item, now_ms));
                    effects.push(Effect::FocusInput);
                }
                effects
            }
            ChipInputEvent::RemoveChip(id) => {
                if self.chips.remove(&id) {
                    self.reset_active();
                    vec![Effect::ChipsChanged(self.chips.to_vec())]
                } else {
                    Vec::new()
                }
            }
            ChipInputEvent::DebounceElapsed(seq) => match self.debounce.fire(seq) {
                Some(query) => vec![Effect::FetchSuggestions { seq, query }],
                None => Vec::new(),
            },
            ChipInputEvent::SuggestionsLoaded { seq, mut items } => {
                if !self.debounce.accepts(seq) {
                    tracing::debug!(seq, latest = self.debounce.latest_seq(), "discarding stale suggestions");
                    return Vec::new();
                }
                items.truncate(self.config.max_suggestions);
                self.suggestions = items;
                self.reset_active();
                Vec::new()
            }
            ChipInputEvent::CandidatesChanged(items) => {
                self.candidates = items;
                if self.config.mode == SuggestionMode::Local {
                    self.recompute_local();
                }
                self.reset_active();
                Vec::new()
            }
            ChipInputEvent::SetChips(chips) => {
                self.chips.replace(chips);
                self.reset_active();
                Vec::new()
            }
        }
    }

    fn on_input(&mut self, value: String, now_ms: u64) -> Vec<Effect> {
        if self.config.allow_free_text {
            if let Some(prefix) = value.strip_suffix(',') {
                let text = prefix.trim();
                if !text.is_empty() {
                    return self.commit(Chip::free_text(text), now_ms);
                }
            }
        }

        self.input = value.clone();
        self.interaction = Interaction::Open { active: None };
        let mut effects = vec![Effect::InputChanged(value)];
        match self.config.mode {
            SuggestionMode::Local => self.recompute_local(),
            SuggestionMode::Remote => {
                let ticket = self.debounce.schedule(self.input.trim(), now_ms);
                effects.push(Effect::ScheduleQuery {
                    seq: ticket.seq,
                    delay_ms: self.debounce.delay_ms(),
                });
            }
        }
        effects
    }

    fn on_key(&mut self, key: Key, now_ms: u64) -> Vec<Effect> {
        match key {
            Key::Backspace => {
                if self.input.is_empty() && self.chips.remove_last().is_some() {
                    self.reset_active();
                    vec![Effect::ChipsChanged(self.chips.to_vec())]
                } else {
                    Vec::new()
                }
            }
            Key::Enter => {
                let mut effects = vec![Effect::PreventDefault];
                let filtered = self.filtered();
                if let Some(item) = self.active().and_then(|i| filtered.get(i)).cloned() {
                    effects.extend(self.commit(item, now_ms));
                } else if self.config.allow_free_text && !self.input.trim().is_empty() {
                    let item = Chip::free_text(&self.input);
                    effects.extend(self.commit(item, now_ms));
                }
                effects
            }
            Key::Escape => self.close(),
            Key::ArrowDown | Key::ArrowUp => {
                if !self.panel_visible() {
                    return Vec::new();
                }
                let n = self.filtered().len();
                let next = match (key, self.active()) {
                    (Key::ArrowDown, Some(i)) if i + 1 < n => i + 1,
                    (Key::ArrowDown, _) => 0,
                    (_, Some(i)) if i > 0 && i < n => i - 1,
                    _ => n - 1,
                };
                self.interaction = Interaction::Open { active: Some(next) };
                vec![Effect::PreventDefault]
            }
            Key::Other => Vec::new(),
        }
    }

    /// Add `item` as a chip. Duplicates leave everything untouched.
    fn commit(&mut self, item: Chip, now_ms: u64) -> Vec<Effect> {
        if !self.chips.add(item) {
            return Vec::new();
        }
        self.input.clear();
        self.interaction = Interaction::Open { active: None };

        let mut effects = vec![
            Effect::ChipsChanged(self.chips.to_vec()),
            Effect::InputChanged(String::new()),
        ];
        effects.extend(self.refresh_now(now_ms));
        effects
    }

    /// Bring suggestions up to date with the current input without debounce
    fn refresh_now(&mut self, now_ms: u64) -> Vec<Effect> {
        match self.config.mode {
            SuggestionMode::Local => {
                self.recompute_local();
                Vec::new()
            }
            SuggestionMode::Remote => {
                let mut effects = Vec::new();
                if self.debounce.has_pending() {
                    effects.push(Effect::CancelQuery);
                }
                let ticket = self.debounce.issue_now(now_ms);
                effects.push(Effect::FetchSuggestions {
                    seq: ticket.seq,
                    query: self.input.trim().to_string(),
                });
                effects
            }
        }
    }

    fn recompute_local(&mut self) {
        self.suggestions = filter_local(&self.candidates, &self.input, self.config.max_suggestions);
    }

    /// Close the panel; a query still waiting out its quiet period is dropped
    fn close(&mut self) -> Vec<Effect> {
        self.interaction = Interaction::Closed;
        if self.debounce.has_pending() {
            self.debounce.cancel();
            vec![Effect::CancelQuery]
        } else {
            Vec::new()
        }
    }

    fn reset_active(&mut self) {
        if let Interaction::Open { active } = &mut self.interaction {
            *active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Chip> {
        vec![
            Chip::new(3, "Engineering (3)", "Engineering"),
            Chip::new(2, "Marketing (2)", "Marketing"),
            Chip::new(1, "Customer Success (1)", "Customer Success"),
        ]
    }

    fn category_machine() -> ChipInputMachine {
        let mut machine = ChipInputMachine::new(ChipInputConfig::categories());
        machine.handle(ChipInputEvent::CandidatesChanged(categories()), 0);
        machine
    }

    fn chips_changed(effects: &[Effect]) -> Option<Vec<String>> {
        effects.iter().find_map(|e| match e {
            Effect::ChipsChanged(chips) => Some(chips.iter().map(|c| c.value.clone()).collect()),
            _ => None,
        })
    }

    #[test]
    fn test_focus_opens_with_all_candidates() {
        let mut machine = category_machine();
        assert!(!machine.panel_visible());

        let effects = machine.handle(ChipInputEvent::Focused, 0);
        assert!(effects.is_empty());
        assert_eq!(machine.interaction(), Interaction::Open { active: None });
        assert_eq!(machine.filtered().len(), 3);
    }

    #[test]
    fn test_arrow_keys_wrap_around() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);

        let down = ChipInputEvent::Key(Key::ArrowDown);
        let up = ChipInputEvent::Key(Key::ArrowUp);

        assert_eq!(machine.handle(down.clone(), 0), vec![Effect::PreventDefault]);
        assert_eq!(machine.active(), Some(0));
        machine.handle(down.clone(), 0);
        machine.handle(down.clone(), 0);
        assert_eq!(machine.active(), Some(2));
        machine.handle(down, 0);
        assert_eq!(machine.active(), Some(0));
        machine.handle(up.clone(), 0);
        assert_eq!(machine.active(), Some(2));
    }

    #[test]
    fn test_arrow_up_from_no_selection_goes_to_last() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::Key(Key::ArrowUp), 0);
        assert_eq!(machine.active(), Some(2));
    }

    #[test]
    fn test_arrows_ignored_when_panel_hidden() {
        let mut machine = category_machine();
        assert!(machine.handle(ChipInputEvent::Key(Key::ArrowDown), 0).is_empty());
        assert_eq!(machine.active(), None);

        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::InputChanged("zzz".into()), 0);
        assert!(!machine.panel_visible());
        assert!(machine.handle(ChipInputEvent::Key(Key::ArrowDown), 0).is_empty());
    }

    #[test]
    fn test_enter_commits_active_suggestion() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::InputChanged("mar".into()), 0);
        machine.handle(ChipInputEvent::Key(Key::ArrowDown), 0);

        let effects = machine.handle(ChipInputEvent::Key(Key::Enter), 0);
        assert_eq!(effects[0], Effect::PreventDefault);
        assert_eq!(chips_changed(&effects), Some(vec!["Marketing".to_string()]));
        assert!(effects.contains(&Effect::InputChanged(String::new())));
        assert_eq!(machine.input(), "");
        assert_eq!(machine.interaction(), Interaction::Open { active: None });
        // Selected category no longer offered
        assert_eq!(machine.filtered().len(), 2);
    }

    #[test]
    fn test_enter_without_free_text_is_noop() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::InputChanged("Design".into()), 0);

        let effects = machine.handle(ChipInputEvent::Key(Key::Enter), 0);
        assert_eq!(effects, vec![Effect::PreventDefault]);
        assert!(machine.chips().is_empty());
        assert_eq!(machine.input(), "Design");
    }

    #[test]
    fn test_enter_commits_free_text() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::search_terms());
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::InputChanged("  rust developer ".into()), 0);

        let effects = machine.handle(ChipInputEvent::Key(Key::Enter), 0);
        assert_eq!(chips_changed(&effects), Some(vec!["rust developer".to_string()]));
        assert_eq!(
            machine.chips().as_slice()[0].id,
            ChipId::Key("freetext-rust developer".into())
        );
    }

    #[test]
    fn test_enter_on_blank_input_only_prevents_default() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::search_terms());
        machine.handle(ChipInputEvent::InputChanged("   ".into()), 0);
        assert_eq!(
            machine.handle(ChipInputEvent::Key(Key::Enter), 0),
            vec![Effect::PreventDefault]
        );
    }

    #[test]
    fn test_comma_commits_prefix() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::search_terms());
        machine.handle(ChipInputEvent::InputChanged("frontend".into()), 0);
        let effects = machine.handle(ChipInputEvent::InputChanged("frontend,".into()), 0);

        assert_eq!(chips_changed(&effects), Some(vec!["frontend".to_string()]));
        assert_eq!(machine.input(), "");
    }

    #[test]
    fn test_lone_comma_is_kept_as_text() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::search_terms());
        let effects = machine.handle(ChipInputEvent::InputChanged(" ,".into()), 0);
        assert_eq!(effects, vec![Effect::InputChanged(" ,".into())]);
        assert!(machine.chips().is_empty());
    }

    #[test]
    fn test_comma_without_free_text_is_plain_input() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::InputChanged("Eng,".into()), 0);
        assert!(machine.chips().is_empty());
        assert_eq!(machine.input(), "Eng,");
    }

    #[test]
    fn test_duplicate_commit_changes_nothing() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::search_terms());
        machine.handle(ChipInputEvent::InputChanged("Frontend,".into()), 0);
        machine.handle(ChipInputEvent::InputChanged("frontend".into()), 0);

        let effects = machine.handle(ChipInputEvent::Key(Key::Enter), 0);
        assert_eq!(effects, vec![Effect::PreventDefault]);
        assert_eq!(machine.chips().len(), 1);
        assert_eq!(machine.input(), "frontend");
    }

    #[test]
    fn test_backspace_removes_last_chip_only_when_empty() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::search_terms());
        machine.handle(ChipInputEvent::SetChips(vec![Chip::free_text("a"), Chip::free_text("b")]), 0);

        machine.handle(ChipInputEvent::InputChanged("x".into()), 0);
        assert!(machine.handle(ChipInputEvent::Key(Key::Backspace), 0).is_empty());

        machine.handle(ChipInputEvent::InputChanged(String::new()), 0);
        let effects = machine.handle(ChipInputEvent::Key(Key::Backspace), 0);
        assert_eq!(chips_changed(&effects), Some(vec!["a".to_string()]));
        assert!(machine.is_open());

        machine.handle(ChipInputEvent::Key(Key::Escape), 0);
        machine.handle(ChipInputEvent::Key(Key::Backspace), 0);
        assert!(machine.chips().is_empty());
        assert!(!machine.is_open());
        assert!(machine.handle(ChipInputEvent::Key(Key::Backspace), 0).is_empty());
    }

    #[test]
    fn test_escape_closes_and_resets_active() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::Key(Key::ArrowDown), 0);
        machine.handle(ChipInputEvent::Key(Key::Escape), 0);
        assert_eq!(machine.interaction(), Interaction::Closed);
        assert_eq!(machine.active(), None);
    }

    #[test]
    fn test_blur_closes_after_grace() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::Key(Key::ArrowDown), 0);

        let effects = machine.handle(ChipInputEvent::Blurred, 0);
        assert_eq!(effects, vec![Effect::ScheduleClose { delay_ms: BLUR_GRACE_MS }]);
        assert!(machine.is_open());

        machine.handle(ChipInputEvent::BlurElapsed, 150);
        assert_eq!(machine.interaction(), Interaction::Closed);
    }

    #[test]
    fn test_refocus_within_grace_keeps_panel_open() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::Blurred, 10);
        machine.handle(ChipInputEvent::Focused, 20);
        machine.handle(ChipInputEvent::BlurElapsed, 160);
        assert!(machine.is_open());
    }

    #[test]
    fn test_suggestion_press_commits_and_refocuses() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);

        let effects = machine.handle(ChipInputEvent::SuggestionPressed(1), 0);
        assert_eq!(effects.first(), Some(&Effect::PreventDefault));
        assert_eq!(effects.last(), Some(&Effect::FocusInput));
        assert_eq!(chips_changed(&effects), Some(vec!["Marketing".to_string()]));

        // Out of range press does nothing beyond suppressing blur
        assert_eq!(
            machine.handle(ChipInputEvent::SuggestionPressed(9), 0),
            vec![Effect::PreventDefault]
        );
    }

    #[test]
    fn test_remove_chip() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::SetChips(categories()), 0);
        let effects = machine.handle(ChipInputEvent::RemoveChip(ChipId::Number(2)), 0);
        assert_eq!(
            chips_changed(&effects),
            Some(vec!["Engineering".to_string(), "Customer Success".to_string()])
        );
        assert!(machine
            .handle(ChipInputEvent::RemoveChip(ChipId::Number(2)), 0)
            .is_empty());
    }

    #[test]
    fn test_set_chips_is_silent() {
        let mut machine = category_machine();
        let effects = machine.handle(ChipInputEvent::SetChips(vec![Chip::new(3, "Engineering (3)", "Engineering")]), 0);
        assert!(effects.is_empty());
        assert_eq!(machine.chips().len(), 1);
    }

    #[test]
    fn test_candidates_changed_resets_active() {
        let mut machine = category_machine();
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::Key(Key::ArrowDown), 0);
        machine.handle(ChipInputEvent::CandidatesChanged(categories()[..1].to_vec()), 0);
        assert_eq!(machine.active(), None);
        assert_eq!(machine.filtered().len(), 1);
    }

    #[test]
    fn test_remote_typing_schedules_debounced_query() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::locations());
        let effects = machine.handle(ChipInputEvent::InputChanged(" Aar ".into()), 0);
        assert_eq!(
            effects,
            vec![
                Effect::InputChanged(" Aar ".into()),
                Effect::ScheduleQuery { seq: 1, delay_ms: DEBOUNCE_MS },
            ]
        );

        assert_eq!(
            machine.handle(ChipInputEvent::DebounceElapsed(1), 200),
            vec![Effect::FetchSuggestions { seq: 1, query: "Aar".into() }]
        );
    }

    #[test]
    fn test_remote_focus_fetches_immediately() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::locations());
        machine.handle(ChipInputEvent::InputChanged("Od".into()), 0);

        let effects = machine.handle(ChipInputEvent::Focused, 50);
        assert_eq!(
            effects,
            vec![
                Effect::CancelQuery,
                Effect::FetchSuggestions { seq: 2, query: "Od".into() },
            ]
        );
        // The superseded timer can no longer fire
        assert!(machine.handle(ChipInputEvent::DebounceElapsed(1), 200).is_empty());
    }

    #[test]
    fn test_remote_stale_results_are_discarded() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::locations());
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(ChipInputEvent::InputChanged("Aa".into()), 10);

        machine.handle(
            ChipInputEvent::SuggestionsLoaded { seq: 1, items: vec![Chip::new("city-1", "Odense", "Odense")] },
            20,
        );
        assert!(machine.filtered().is_empty());

        machine.handle(ChipInputEvent::DebounceElapsed(2), 210);
        machine.handle(
            ChipInputEvent::SuggestionsLoaded { seq: 2, items: vec![Chip::new("city-2", "Aarhus", "Aarhus")] },
            230,
        );
        assert_eq!(machine.filtered()[0].value, "Aarhus");
    }

    #[test]
    fn test_remote_commit_refreshes_with_empty_query() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::locations());
        machine.handle(ChipInputEvent::Focused, 0);
        machine.handle(
            ChipInputEvent::SuggestionsLoaded { seq: 1, items: vec![Chip::new("city-2", "Aarhus", "Aarhus")] },
            5,
        );
        let effects = machine.handle(ChipInputEvent::SuggestionPressed(0), 10);
        assert!(effects.contains(&Effect::FetchSuggestions { seq: 2, query: String::new() }));
    }

    #[test]
    fn test_remote_value_dedup_hides_free_text_duplicates() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::locations());
        machine.handle(ChipInputEvent::InputChanged("aarhus,".into()), 0);
        machine.handle(
            ChipInputEvent::SuggestionsLoaded {
                seq: 1,
                items: vec![Chip::new("city-2", "Aarhus", "Aarhus"), Chip::new("city-3", "Odense", "Odense")],
            },
            5,
        );
        let values: Vec<_> = machine.filtered().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["Odense"]);
    }

    #[test]
    fn test_closing_drops_pending_query() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::locations());
        machine.handle(ChipInputEvent::InputChanged("K".into()), 0);
        assert_eq!(machine.handle(ChipInputEvent::Key(Key::Escape), 50), vec![Effect::CancelQuery]);
        assert!(!machine.is_open());
        assert!(machine.handle(ChipInputEvent::DebounceElapsed(1), 200).is_empty());

        machine.handle(ChipInputEvent::InputChanged("Ko".into()), 300);
        machine.handle(ChipInputEvent::Blurred, 310);
        assert_eq!(machine.handle(ChipInputEvent::BlurElapsed, 460), vec![Effect::CancelQuery]);
        assert!(machine.handle(ChipInputEvent::DebounceElapsed(2), 500).is_empty());

        // Nothing pending, nothing to cancel
        assert!(machine.handle(ChipInputEvent::Key(Key::Escape), 600).is_empty());
    }

    #[test]
    fn test_filter_changes_reset_active() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::locations());
        machine.handle(ChipInputEvent::Focused, 0);
        let cities = vec![
            Chip::new("city-1", "Aarhus", "Aarhus"),
            Chip::new("city-2", "Aalborg", "Aalborg"),
            Chip::new("city-3", "Odense", "Odense"),
        ];
        machine.handle(ChipInputEvent::SuggestionsLoaded { seq: 1, items: cities.clone() }, 0);
        let down = ChipInputEvent::Key(Key::ArrowDown);

        machine.handle(down.clone(), 0);
        machine.handle(ChipInputEvent::SuggestionsLoaded { seq: 1, items: cities[1..].to_vec() }, 0);
        assert_eq!(machine.active(), None, "after new suggestions");

        machine.handle(down.clone(), 0);
        machine.handle(ChipInputEvent::SetChips(vec![cities[1].clone()]), 0);
        assert_eq!(machine.active(), None, "after chips replaced");

        machine.handle(down.clone(), 0);
        machine.handle(ChipInputEvent::RemoveChip(cities[1].id.clone()), 0);
        assert_eq!(machine.active(), None, "after chip removed");

        machine.handle(ChipInputEvent::SetChips(vec![cities[2].clone()]), 0);
        machine.handle(down, 0);
        assert_eq!(machine.active(), Some(0));
        machine.handle(ChipInputEvent::Key(Key::Backspace), 0);
        assert_eq!(machine.active(), None, "after backspace");
        assert_eq!(machine.filtered().len(), 2);
    }

    #[test]
    fn test_suggestions_truncated_to_max() {
        let mut machine = ChipInputMachine::new(ChipInputConfig::locations());
        machine.handle(ChipInputEvent::Focused, 0);
        let items: Vec<Chip> = (0..12)
            .map(|i| Chip::new(format!("city-{i}").as_str(), format!("By {i}"), format!("By {i}")))
            .collect();
        machine.handle(ChipInputEvent::SuggestionsLoaded { seq: 1, items }, 0);
        assert_eq!(machine.filtered().len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_key_name("Esc"), Key::Escape);
        assert_eq!(Key::from_key_name("a"), Key::Other);
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        fn pool() -> Vec<Chip> {
            vec![
                Chip::new(3, "Engineering (3)", "Engineering"),
                Chip::new(2, "Marketing (2)", "Marketing"),
                Chip::new("city-1", "Aarhus", "Aarhus"),
                Chip::new("city-2", "Aalborg", "Aalborg"),
                Chip::free_text("aarhus"),
            ]
        }

        fn arb_chips() -> impl Strategy<Value = Vec<Chip>> {
            proptest::sample::subsequence(pool(), 0..=5)
        }

        fn arb_config() -> impl Strategy<Value = ChipInputConfig> {
            prop_oneof![
                Just(ChipInputConfig::search_terms()),
                Just(ChipInputConfig::categories()),
                Just(ChipInputConfig::locations()),
            ]
        }

        fn arb_key() -> impl Strategy<Value = Key> {
            prop_oneof![
                Just(Key::ArrowDown),
                Just(Key::ArrowUp),
                Just(Key::Enter),
                Just(Key::Escape),
                Just(Key::Backspace),
                Just(Key::Other),
            ]
        }

        fn arb_event() -> impl Strategy<Value = ChipInputEvent> {
            prop_oneof![
                Just(ChipInputEvent::Focused),
                Just(ChipInputEvent::Blurred),
                Just(ChipInputEvent::BlurElapsed),
                proptest::sample::select(vec!["", "a", "Aa", "mar", "eng,", ",", "aarhus,"])
                    .prop_map(|text| ChipInputEvent::InputChanged(text.to_string())),
                arb_key().prop_map(ChipInputEvent::Key),
                (0usize..6).prop_map(ChipInputEvent::SuggestionPressed),
                (0u64..12).prop_map(ChipInputEvent::DebounceElapsed),
                (0u64..12, arb_chips()).prop_map(|(seq, items)| ChipInputEvent::SuggestionsLoaded { seq, items }),
                arb_chips().prop_map(ChipInputEvent::SetChips),
                proptest::sample::select(pool()).prop_map(|chip| ChipInputEvent::RemoveChip(chip.id)),
                arb_chips().prop_map(ChipInputEvent::CandidatesChanged),
            ]
        }

        proptest! {
            #[test]
            fn prop_active_index_tracks_filtered_list(
                config in arb_config(),
                events in proptest::collection::vec(arb_event(), 0..60),
            ) {
                let mut machine = ChipInputMachine::new(config);
                machine.handle(ChipInputEvent::CandidatesChanged(pool()), 0);

                for (step, event) in events.into_iter().enumerate() {
                    let before = machine.filtered();
                    machine.handle(event, step as u64 * 40);
                    let after = machine.filtered();

                    if let Some(active) = machine.active() {
                        prop_assert!(active < after.len());
                    }
                    if after != before {
                        prop_assert_eq!(machine.active(), None);
                    }
                    prop_assert!(after.iter().all(|c| !machine.chips().excludes(c)));
                }
            }
        }
    }
}
