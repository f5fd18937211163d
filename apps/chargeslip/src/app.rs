use crate::logging::SharedLogStore;
use chargeslip_application::config::{Config, LotTable};
use chargeslip_application::form::to_trade_input;
use chargeslip_application::formatting::MoneyFormat;
use chargeslip_application::quote::{quote_input, Quote};
use chargeslip_application::snapshot::{persist, restore, DebouncedSnapshot};
use chargeslip_domain::repositories::snapshot::SnapshotStore;
use chargeslip_domain::value_objects::instrument::{InstrumentCategory, Segment};
use chargeslip_domain::value_objects::snapshot::{
    FormFields, FormSnapshot, InputMode, Theme, SNAPSHOT_VERSION,
};
use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

const INFO_TTL: Duration = Duration::from_secs(2);

pub enum AppEvent {
    Input(CtEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    /// Cursor position in chars, not bytes.
    pub cursor: usize,
}

impl TextInput {
    pub fn new(value: String) -> Self {
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = self.byte_index();
        self.value.insert(idx, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.value.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let idx = self.byte_index();
        self.value.remove(idx);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    BuyPrice,
    SellPrice,
    Quantity,
    Amount,
    StrikePrice,
    Venue,
    Commodity,
}

impl FieldId {
    pub fn label(self) -> &'static str {
        match self {
            Self::BuyPrice => "Buy price",
            Self::SellPrice => "Sell price",
            Self::Quantity => "Quantity",
            Self::Amount => "Amount",
            Self::StrikePrice => "Strike price",
            Self::Venue => "Exchange",
            Self::Commodity => "Commodity",
        }
    }

    pub fn is_selector(self) -> bool {
        matches!(self, Self::Venue | Self::Commodity)
    }

    /// Fields shown for `category`, top to bottom.
    pub fn visible(category: InstrumentCategory, mode: InputMode) -> Vec<FieldId> {
        let mut fields = vec![Self::BuyPrice, Self::SellPrice];
        fields.push(match mode {
            InputMode::Quantity => Self::Quantity,
            InputMode::Amount => Self::Amount,
        });
        if category.takes_strike() {
            fields.push(Self::StrikePrice);
        }
        if category.uses_venue() {
            fields.push(Self::Venue);
        }
        if category.uses_commodity() {
            fields.push(Self::Commodity);
        }
        fields
    }
}

/// Editable state of one category's form.
pub struct FormEditor {
    pub buy_price: TextInput,
    pub sell_price: TextInput,
    pub quantity: TextInput,
    pub amount: TextInput,
    pub strike_price: TextInput,
    pub fields: FormFields,
}

impl FormEditor {
    pub fn from_fields(fields: FormFields) -> Self {
        Self {
            buy_price: TextInput::new(fields.buy_price.clone()),
            sell_price: TextInput::new(fields.sell_price.clone()),
            quantity: TextInput::new(fields.quantity.clone()),
            amount: TextInput::new(fields.amount.clone()),
            strike_price: TextInput::new(fields.strike_price.clone()),
            fields,
        }
    }

    pub fn to_fields(&self) -> FormFields {
        FormFields {
            buy_price: self.buy_price.value.clone(),
            sell_price: self.sell_price.value.clone(),
            quantity: self.quantity.value.clone(),
            amount: self.amount.value.clone(),
            strike_price: self.strike_price.value.clone(),
            ..self.fields.clone()
        }
    }

    pub fn input(&self, field: FieldId) -> Option<&TextInput> {
        match field {
            FieldId::BuyPrice => Some(&self.buy_price),
            FieldId::SellPrice => Some(&self.sell_price),
            FieldId::Quantity => Some(&self.quantity),
            FieldId::Amount => Some(&self.amount),
            FieldId::StrikePrice => Some(&self.strike_price),
            FieldId::Venue | FieldId::Commodity => None,
        }
    }

    fn input_mut(&mut self, field: FieldId) -> Option<&mut TextInput> {
        match field {
            FieldId::BuyPrice => Some(&mut self.buy_price),
            FieldId::SellPrice => Some(&mut self.sell_price),
            FieldId::Quantity => Some(&mut self.quantity),
            FieldId::Amount => Some(&mut self.amount),
            FieldId::StrikePrice => Some(&mut self.strike_price),
            FieldId::Venue | FieldId::Commodity => None,
        }
    }
}

pub struct App {
    pub config: Config,
    lots: LotTable,
    money: MoneyFormat,

    pub theme: Theme,
    pub active_category: InstrumentCategory,
    /// One editor per category, indexed by `InstrumentCategory::index`.
    forms: Vec<FormEditor>,
    pub focus: FieldId,
    pub quote: Quote,

    pub logs: SharedLogStore,
    pub log_scroll: usize,

    store: Option<Box<dyn SnapshotStore>>,
    autosave: DebouncedSnapshot,

    pub dirty: bool,
    pub last_error: Option<String>,
    pub info_message: Option<String>,
    info_expires_at: Option<Instant>,
}

impl App {
    pub fn new(config: Config, store: Option<Box<dyn SnapshotStore>>, logs: SharedLogStore) -> Self {
        let blank = default_fields(&config);
        let fallback = FormSnapshot {
            active_category: config.defaults.category,
            ..FormSnapshot::default()
        };
        let snapshot = match store.as_deref() {
            Some(store) => restore(store, fallback),
            None => fallback,
        };
        let forms = InstrumentCategory::ALL
            .into_iter()
            .map(|category| {
                let fields = snapshot
                    .forms
                    .get(&category)
                    .cloned()
                    .unwrap_or_else(|| blank.clone());
                FormEditor::from_fields(fields)
            })
            .collect();

        let lots = config.lot_table();
        let money = MoneyFormat::from(&config.display);
        let active_category = snapshot.active_category;
        let quote = quote_input(active_category, Default::default(), &money);
        let autosave = DebouncedSnapshot::new(Duration::from_millis(config.persistence.debounce_ms));

        let mut app = Self {
            config,
            lots,
            money,
            theme: snapshot.theme,
            active_category,
            forms,
            focus: FieldId::BuyPrice,
            quote,
            logs,
            log_scroll: 0,
            store,
            autosave,
            dirty: true,
            last_error: None,
            info_message: None,
            info_expires_at: None,
        };
        app.recompute();
        app
    }

    pub fn spawn_input_reader(&self, tx: tokio::sync::mpsc::UnboundedSender<AppEvent>) {
        std::thread::spawn(move || {
            while let Ok(event) = crossterm::event::read() {
                if tx.send(AppEvent::Input(event)).is_err() {
                    break;
                }
            }
        });
    }

    pub fn editor(&self) -> &FormEditor {
        &self.forms[self.active_category.index()]
    }

    fn editor_mut(&mut self) -> &mut FormEditor {
        &mut self.forms[self.active_category.index()]
    }

    pub fn visible_fields(&self) -> Vec<FieldId> {
        FieldId::visible(self.active_category, self.editor().fields.input_mode)
    }

    pub fn persistence_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: None,
            theme: self.theme,
            active_category: self.active_category,
            forms: InstrumentCategory::ALL
                .into_iter()
                .map(|category| (category, self.forms[category.index()].to_fields()))
                .collect(),
        }
    }

    pub fn on_tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if let Some(until) = self.info_expires_at {
            if now >= until {
                self.info_message = None;
                self.info_expires_at = None;
                self.dirty = true;
            }
        }

        if self.autosave.take_due(now) {
            if let Err(err) = self.save_snapshot() {
                self.set_error_and_clear_info(&err);
            }
        }
    }

    pub fn on_event(&mut self, event: AppEvent) -> Result<bool, String> {
        match event {
            AppEvent::Input(ct) => self.on_input(ct),
        }
    }

    fn on_input(&mut self, event: CtEvent) -> Result<bool, String> {
        match event {
            CtEvent::Key(key) => self.on_key(key),
            CtEvent::Resize(_, _) => {
                self.dirty = true;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<bool, String> {
        if key.kind == KeyEventKind::Release {
            return Ok(false);
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Char(']') => self.switch_category(1),
            KeyCode::Char('[') => self.switch_category(-1),
            KeyCode::Char('>') => self.switch_segment(1),
            KeyCode::Char('<') => self.switch_segment(-1),
            KeyCode::Char('m') => self.toggle_input_mode(),
            KeyCode::Char('t') => {
                self.theme = self.theme.toggled();
                self.touch_snapshot();
            }
            KeyCode::Char('v') if self.active_category.uses_venue() => {
                self.cycle_selector(FieldId::Venue, 1)
            }
            KeyCode::Char('c') if self.active_category.uses_commodity() => {
                self.cycle_selector(FieldId::Commodity, 1)
            }
            KeyCode::Char('r') => self.reset_form(),
            KeyCode::Char('s') => self.save_now(),
            KeyCode::PageUp => {
                let len = self.logs.lock().len();
                self.log_scroll = (self.log_scroll + 5).min(len);
            }
            KeyCode::PageDown => self.log_scroll = self.log_scroll.saturating_sub(5),
            KeyCode::Left | KeyCode::Right if self.focus.is_selector() => {
                let step = if key.code == KeyCode::Left { -1 } else { 1 };
                self.cycle_selector(self.focus, step);
            }
            code => self.edit_focused(code),
        }
        self.dirty = true;
        Ok(false)
    }

    fn edit_focused(&mut self, code: KeyCode) {
        let focus = self.focus;
        let Some(input) = self.editor_mut().input_mut(focus) else {
            return;
        };
        let changed = match code {
            KeyCode::Char(ch) if is_numeric_char(ch) => {
                input.insert_char(ch);
                true
            }
            KeyCode::Backspace => {
                input.backspace();
                true
            }
            KeyCode::Delete => {
                input.delete();
                true
            }
            KeyCode::Left => {
                input.move_left();
                false
            }
            KeyCode::Right => {
                input.move_right();
                false
            }
            KeyCode::Home => {
                input.move_home();
                false
            }
            KeyCode::End => {
                input.move_end();
                false
            }
            _ => false,
        };
        if changed {
            self.on_form_changed();
        }
    }

    fn move_focus(&mut self, step: isize) {
        let fields = self.visible_fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(fields.len() as isize) as usize;
        self.focus = fields[next];
    }

    fn switch_category(&mut self, step: isize) {
        let categories = self.active_category.segment().categories();
        let current = categories
            .iter()
            .position(|c| *c == self.active_category)
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(categories.len() as isize) as usize;
        self.activate(categories[next]);
    }

    fn switch_segment(&mut self, step: isize) {
        let segments = Segment::ALL;
        let current = segments
            .iter()
            .position(|s| *s == self.active_category.segment())
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(segments.len() as isize) as usize;
        self.activate(segments[next].categories()[0]);
    }

    fn activate(&mut self, category: InstrumentCategory) {
        if category == self.active_category {
            return;
        }
        self.active_category = category;
        if !self.visible_fields().contains(&self.focus) {
            self.focus = FieldId::BuyPrice;
        }
        tracing::debug!(category = %category, "switched category");
        self.recompute();
        self.touch_snapshot();
    }

    fn toggle_input_mode(&mut self) {
        let editor = self.editor_mut();
        editor.fields.input_mode = editor.fields.input_mode.toggled();
        let mode = editor.fields.input_mode;
        self.focus = match (self.focus, mode) {
            (FieldId::Quantity, InputMode::Amount) => FieldId::Amount,
            (FieldId::Amount, InputMode::Quantity) => FieldId::Quantity,
            (focus, _) => focus,
        };
        self.on_form_changed();
    }

    fn cycle_selector(&mut self, field: FieldId, step: isize) {
        let fields = &mut self.editor_mut().fields;
        match field {
            FieldId::Venue => fields.venue = fields.venue.toggled(),
            FieldId::Commodity => {
                fields.commodity = if step < 0 {
                    fields.commodity.prev()
                } else {
                    fields.commodity.next()
                };
            }
            _ => return,
        }
        self.on_form_changed();
    }

    fn reset_form(&mut self) {
        let blank = default_fields(&self.config);
        *self.editor_mut() = FormEditor::from_fields(blank);
        self.focus = FieldId::BuyPrice;
        self.set_info("form cleared");
        self.on_form_changed();
    }

    fn on_form_changed(&mut self) {
        self.recompute();
        self.touch_snapshot();
    }

    fn touch_snapshot(&mut self) {
        if self.store.is_some() {
            self.autosave.mark_dirty(Instant::now());
        }
    }

    pub fn recompute(&mut self) {
        let fields = self.editor().to_fields();
        let input = to_trade_input(self.active_category, &fields, &self.lots);
        self.quote = quote_input(self.active_category, input, &self.money);
        self.dirty = true;
    }

    fn save_now(&mut self) {
        if self.store.is_none() {
            self.set_error_and_clear_info("snapshot persistence is disabled");
            return;
        }
        self.autosave.take_pending();
        match self.save_snapshot() {
            Ok(()) => self.set_info("state saved"),
            Err(err) => self.set_error_and_clear_info(&err),
        }
    }

    fn save_snapshot(&mut self) -> Result<(), String> {
        let Some(store) = self.store.as_deref() else {
            return Ok(());
        };
        let result = persist(store, &self.snapshot());
        match &result {
            Ok(()) => self.last_error = None,
            Err(err) => tracing::warn!(error = %err, "failed to save snapshot"),
        }
        self.dirty = true;
        result
    }

    fn set_info(&mut self, msg: &str) {
        self.info_message = Some(msg.to_string());
        self.info_expires_at = Some(Instant::now() + INFO_TTL);
    }

    fn set_error_and_clear_info(&mut self, msg: &str) {
        self.last_error = Some(msg.to_string());
        self.info_message = None;
        self.info_expires_at = None;
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if self.autosave.take_pending() {
            let _ = self.save_snapshot();
        }
    }
}

fn default_fields(config: &Config) -> FormFields {
    FormFields {
        venue: config.defaults.venue,
        commodity: config.defaults.commodity,
        ..FormFields::default()
    }
}

fn is_numeric_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+')
}

#[cfg(test)]
mod tests {
    use super::{App, AppEvent, FieldId, TextInput};
    use crate::logging::LogStore;
    use chargeslip_application::config::Config;
    use chargeslip_domain::repositories::snapshot::SnapshotStore;
    use chargeslip_domain::value_objects::charges::ChargeKind;
    use chargeslip_domain::value_objects::commodity::Commodity;
    use chargeslip_domain::value_objects::instrument::InstrumentCategory;
    use chargeslip_domain::value_objects::snapshot::{FormFields, FormSnapshot, InputMode, Theme};
    use chargeslip_domain::value_objects::venue::Venue;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    #[derive(Clone, Default)]
    struct MemoryStore {
        slot: Rc<RefCell<Option<FormSnapshot>>>,
        saves: Rc<RefCell<usize>>,
    }

    impl SnapshotStore for MemoryStore {
        fn load(&self) -> Result<Option<FormSnapshot>, String> {
            Ok(self.slot.borrow().clone())
        }

        fn save(&self, snapshot: &FormSnapshot) -> Result<(), String> {
            *self.slot.borrow_mut() = Some(snapshot.clone());
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
    }

    fn make_app(store: Option<MemoryStore>) -> App {
        App::new(
            Config::default(),
            store.map(|s| Box::new(s) as Box<dyn SnapshotStore>),
            LogStore::shared(10),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.on_event(AppEvent::Input(Event::Key(KeyEvent::new(
            code,
            KeyModifiers::NONE,
        ))))
        .expect("key handled")
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn fill(app: &mut App, bp: &str, sp: &str, qty: &str) {
        type_str(app, bp);
        press(app, KeyCode::Tab);
        type_str(app, sp);
        press(app, KeyCode::Tab);
        type_str(app, qty);
    }

    #[test]
    fn text_input_edits_at_cursor() {
        let mut input = TextInput::new("15".to_string());
        input.move_left();
        input.insert_char('0');
        assert_eq!(input.value, "105");
        input.move_home();
        input.delete();
        assert_eq!(input.value, "05");
        input.move_end();
        input.backspace();
        assert_eq!(input.value, "0");
    }

    #[test]
    fn text_input_handles_multibyte_values() {
        let mut input = TextInput::new("₹5".to_string());
        input.move_left();
        input.backspace();
        assert_eq!(input.value, "5");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn typing_recomputes_the_quote() {
        let mut app = make_app(None);
        fill(&mut app, "100", "105", "10");
        assert_eq!(app.quote.breakdown.turnover, 2050.0);
        assert_eq!(app.quote.row(ChargeKind::Pnl).map(|r| r.display.as_str()), Some("₹48.90"));
    }

    #[test]
    fn letters_are_not_typed_and_q_quits() {
        let mut app = make_app(None);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.editor().buy_price.value, "");
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn categories_keep_independent_forms() {
        let mut app = make_app(None);
        type_str(&mut app, "250");
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.active_category, InstrumentCategory::DeliveryEquity);
        assert_eq!(app.editor().buy_price.value, "");

        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.editor().buy_price.value, "250");

        press(&mut app, KeyCode::Char('>'));
        assert_eq!(app.active_category, InstrumentCategory::CurrencyFutures);
        press(&mut app, KeyCode::Char('<'));
        press(&mut app, KeyCode::Char('<'));
        assert_eq!(app.active_category, InstrumentCategory::CommodityFutures);
    }

    #[test]
    fn amount_mode_swaps_quantity_field() {
        let mut app = make_app(None);
        type_str(&mut app, "50");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, FieldId::Quantity);

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.focus, FieldId::Amount);
        assert!(app.visible_fields().contains(&FieldId::Amount));
        type_str(&mut app, "1000");
        assert_eq!(app.quote.input.quantity, 20.0);
        assert_eq!(app.editor().fields.input_mode, InputMode::Amount);
    }

    #[test]
    fn selectors_cycle_with_arrows() {
        let mut app = make_app(None);
        while app.focus != FieldId::Venue {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Right);
        assert_eq!(app.editor().fields.venue, Venue::Bse);
        assert_eq!(app.quote.input.venue, Venue::Bse);

        press(&mut app, KeyCode::Char('>'));
        press(&mut app, KeyCode::Char('>'));
        assert_eq!(app.active_category, InstrumentCategory::CommodityFutures);
        assert_eq!(app.focus, FieldId::BuyPrice);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.editor().fields.commodity, Commodity::GoldM);
        assert_eq!(app.quote.input.lot_multiplier, 10);
    }

    #[test]
    fn edits_are_saved_after_debounce() {
        let store = MemoryStore::default();
        let mut app = make_app(Some(store.clone()));
        fill(&mut app, "100", "105", "10");
        press(&mut app, KeyCode::Char('t'));

        app.tick_at(Instant::now());
        assert_eq!(*store.saves.borrow(), 0);

        app.tick_at(Instant::now() + Duration::from_secs(1));
        assert_eq!(*store.saves.borrow(), 1);

        let saved = store.slot.borrow().clone().expect("snapshot saved");
        assert_eq!(saved.theme, Theme::Light);
        let form = saved.form(InstrumentCategory::IntradayEquity);
        assert_eq!(form.buy_price, "100");
        assert_eq!(form.quantity, "10");
    }

    #[test]
    fn restores_previous_session() {
        let store = MemoryStore::default();
        let mut snapshot = FormSnapshot {
            theme: Theme::Light,
            active_category: InstrumentCategory::CurrencyOptions,
            ..FormSnapshot::default()
        };
        snapshot.forms.insert(
            InstrumentCategory::CurrencyOptions,
            FormFields {
                buy_price: "0.5".to_string(),
                sell_price: "0.75".to_string(),
                quantity: "2".to_string(),
                strike_price: "83".to_string(),
                ..FormFields::default()
            },
        );
        store.save(&snapshot).expect("seed");

        let app = make_app(Some(store));
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(app.active_category, InstrumentCategory::CurrencyOptions);
        assert_eq!(app.editor().strike_price.value, "83");
        assert_eq!(app.quote.input.strike_price, 83.0);
        assert!(app.visible_fields().contains(&FieldId::StrikePrice));
    }

    #[test]
    fn pending_edit_is_flushed_on_drop() {
        let store = MemoryStore::default();
        {
            let mut app = make_app(Some(store.clone()));
            type_str(&mut app, "42");
        }
        let saved = store.slot.borrow().clone().expect("flushed on drop");
        assert_eq!(saved.form(InstrumentCategory::IntradayEquity).buy_price, "42");
    }

    #[test]
    fn manual_save_without_store_reports_error() {
        let mut app = make_app(None);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.last_error.is_some());
        assert!(!app.persistence_enabled());
    }
}
