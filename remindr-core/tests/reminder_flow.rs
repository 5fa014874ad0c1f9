use std::cell::RefCell;
use std::collections::HashSet;

use chrono::NaiveDate;
use remindr_core::sheet::{parse_important_dates, parse_templates};
use remindr_core::sync::{CalendarStore, DateWindow, apply, plan};
use remindr_core::{
    Horizon, ImportantDateRecord, Recurrence, RemindrError, RemindrResult, ReminderInstance,
    ReminderSpec, ReminderTemplate, SourceKey, TemplateCatalog, generate_all,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reminder(offset_days: i64, title: &str, description: &str) -> ReminderSpec {
    ReminderSpec {
        offset_days,
        title_pattern: title.to_string(),
        description_pattern: description.to_string(),
    }
}

fn birthday_template() -> ReminderTemplate {
    ReminderTemplate {
        name: "birthday_with_card".to_string(),
        description: "Birthday with card reminder sequence".to_string(),
        reminders: vec![
            reminder(-14, "Buy birthday card for {Person}", "{Person}'s birthday is on {Date}. Time to buy a card!"),
            reminder(-10, "Write card for {Person}", "Notes: {Notes}"),
            reminder(-7, "Send birthday card to {Person}", "{Person}'s birthday is in a week on {Date}."),
            reminder(0, "Send birthday message to {Person}", "Today is {Person}'s birthday!"),
            reminder(0, "Call {Person}", "{Unknown} stays as is"),
        ],
    }
}

fn johns_birthday() -> ImportantDateRecord {
    ImportantDateRecord {
        event_name: "John's Birthday".to_string(),
        date: date(2025, 6, 15),
        category: "birthday_with_card".to_string(),
        person: "John Smith".to_string(),
        notes: "Likes chocolate cake".to_string(),
        recurrence: Recurrence::Yearly,
    }
}

fn catalog() -> TemplateCatalog {
    TemplateCatalog::load([birthday_template()]).unwrap()
}

/// Run on 2025-05-01 with a 12 month horizon: the 2026 birthday is out of range.
fn one_year() -> Horizon {
    Horizon::months_from(date(2025, 5, 1), 12)
}

#[derive(Default)]
struct MemoryStore {
    keys: RefCell<HashSet<SourceKey>>,
}

impl CalendarStore for MemoryStore {
    async fn list_existing_keys(&self, _window: DateWindow) -> RemindrResult<HashSet<SourceKey>> {
        Ok(self.keys.borrow().clone())
    }

    async fn create_event(&self, instance: &ReminderInstance) -> RemindrResult<String> {
        self.keys.borrow_mut().insert(instance.source_key.clone());
        Ok(format!("evt-{}", self.keys.borrow().len()))
    }
}

#[test]
fn johns_birthday_yields_five_reminders() {
    let instances = generate_all(&[johns_birthday()], &catalog(), one_year()).unwrap();

    let dates: Vec<NaiveDate> = instances.iter().map(|i| i.reminder_date).collect();
    assert_eq!(
        dates,
        vec![
            date(2025, 6, 1),
            date(2025, 6, 5),
            date(2025, 6, 8),
            date(2025, 6, 15),
            date(2025, 6, 15),
        ]
    );

    let titles: Vec<&str> = instances.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Buy birthday card for John Smith",
            "Write card for John Smith",
            "Send birthday card to John Smith",
            "Send birthday message to John Smith",
            "Call John Smith",
        ]
    );

    assert_eq!(
        instances[0].description,
        "John Smith's birthday is on 2025-06-15. Time to buy a card!"
    );
    assert_eq!(instances[1].description, "Notes: Likes chocolate cake");
    assert_eq!(instances[4].description, "{Unknown} stays as is");

    let keys: HashSet<_> = instances.iter().map(|i| &i.source_key).collect();
    assert_eq!(keys.len(), 5, "same-day reminders must still have distinct keys");
}

#[test]
fn longer_horizon_adds_the_next_cycle() {
    let horizon = Horizon::months_from(date(2025, 5, 1), 14);
    let instances = generate_all(&[johns_birthday()], &catalog(), horizon).unwrap();

    assert_eq!(instances.len(), 10);
    let next: Vec<NaiveDate> = instances[5..].iter().map(|i| i.reminder_date).collect();
    assert_eq!(
        next,
        vec![
            date(2026, 6, 1),
            date(2026, 6, 5),
            date(2026, 6, 8),
            date(2026, 6, 15),
            date(2026, 6, 15),
        ]
    );
    assert!(instances[5..].iter().all(|i| i.occurrence_date == date(2026, 6, 15)));
}

#[test]
fn generation_is_deterministic() {
    let records = vec![
        johns_birthday(),
        ImportantDateRecord {
            event_name: "Ada's Birthday".to_string(),
            date: date(2025, 6, 1),
            person: "Ada".to_string(),
            ..johns_birthday()
        },
    ];

    let first = generate_all(&records, &catalog(), one_year()).unwrap();
    let second = generate_all(&records, &catalog(), one_year()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_category_fails_the_whole_run() {
    let records = vec![
        johns_birthday(),
        ImportantDateRecord {
            event_name: "Mystery".to_string(),
            category: "not_a_template".to_string(),
            ..johns_birthday()
        },
    ];

    let err = generate_all(&records, &catalog(), one_year()).unwrap_err();
    match err {
        RemindrError::UnknownTemplate { category, event } => {
            assert_eq!(category, "not_a_template");
            assert_eq!(event.as_deref(), Some("Mystery"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn second_sync_creates_nothing() {
    let store = MemoryStore::default();
    let instances = generate_all(&[johns_birthday()], &catalog(), one_year()).unwrap();
    let window = DateWindow::covering(&instances).unwrap();

    let existing = store.list_existing_keys(window).await.unwrap();
    let first = plan(&existing, instances.clone());
    assert_eq!(first.to_create.len(), 5);

    let stats = apply(&store, &first).await;
    assert_eq!(stats.created, 5);
    assert!(stats.is_complete());

    let existing = store.list_existing_keys(window).await.unwrap();
    let second = plan(&existing, instances);
    assert!(second.is_up_to_date());
    assert_eq!(second.to_skip.len(), 5);
}

#[tokio::test]
async fn new_record_only_adds_its_own_reminders() {
    let store = MemoryStore::default();
    let catalog = catalog();

    let before = generate_all(&[johns_birthday()], &catalog, one_year()).unwrap();
    apply(&store, &plan(&HashSet::new(), before)).await;

    let records = vec![
        johns_birthday(),
        ImportantDateRecord {
            event_name: "Mum's Birthday".to_string(),
            date: date(2025, 9, 3),
            person: "Mum".to_string(),
            recurrence: Recurrence::None,
            ..johns_birthday()
        },
    ];
    let after = generate_all(&records, &catalog, one_year()).unwrap();
    let window = DateWindow::covering(&after).unwrap();
    let next = plan(&store.list_existing_keys(window).await.unwrap(), after);

    assert_eq!(next.to_create.len(), 5);
    assert!(next.to_create.iter().all(|i| i.event_name == "Mum's Birthday"));
}

#[test]
fn sheet_rows_drive_generation() {
    let row = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>();

    let date_rows = vec![row(&[
        "Rent",
        "2025-01-31",
        "bill",
        "",
        "Flat 4",
        "Monthly",
    ])];
    let template_rows = vec![row(&["bill", "Bills", "-3", "Pay {Event Name}", "{Notes} due {Date}"])];

    let records = parse_important_dates("Important Dates", &date_rows).unwrap();
    let catalog = TemplateCatalog::load(parse_templates("Templates", &template_rows).unwrap()).unwrap();

    let horizon = Horizon::new(date(2025, 1, 1), date(2025, 3, 31));
    let instances = generate_all(&records, &catalog, horizon).unwrap();

    let occurrences: Vec<NaiveDate> = instances.iter().map(|i| i.occurrence_date).collect();
    assert_eq!(occurrences, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]);
    assert_eq!(instances[1].reminder_date, date(2025, 2, 25));
    assert_eq!(instances[1].title, "Pay Rent");
    assert_eq!(instances[1].description, "Flat 4 due 2025-02-28");
}
