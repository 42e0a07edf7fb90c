use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

/// Upper bound on tickets bought in a single purchase.
pub const MAX_TICKETS_PER_PURCHASE: i32 = 10;

/// Decimal places kept for prices; matches the `NUMERIC(12,2)` columns.
pub const PRICE_SCALE: u32 = 2;

/// Highest ticket price, in FCFA. A full purchase of
/// `MAX_TICKETS_PER_PURCHASE` tickets still fits a `NUMERIC(12,2)` total.
pub fn max_price() -> Decimal {
    Decimal::new(99_999_999_999, PRICE_SCALE)
}

/// Moderation state of an event.
///
/// Events are created `Pending`; an admin moves them to `Approved` or
/// `Rejected`. No other transition is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
        }
    }

    pub fn can_transition_to(self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Pending, EventStatus::Approved)
                | (EventStatus::Pending, EventStatus::Rejected)
        )
    }

    /// Returns `next` when the move is a legal moderation step.
    pub fn transition(self, next: EventStatus) -> Result<EventStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::conflict(format!(
                "Cannot move an event from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub price: Decimal,
    pub max_tickets: i32,
    pub available_tickets: i32,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// A freshly submitted event: pending moderation, full inventory.
    pub fn new(input: EventInput, organizer_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            location: input.location,
            date: input.date,
            time: input.time,
            price: input.price,
            max_tickets: input.max_tickets,
            available_tickets: input.max_tickets,
            image_url: input.image_url,
            status: EventStatus::Pending,
            organizer_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }

    pub fn sold_tickets(&self) -> i32 {
        self.max_tickets - self.available_tickets
    }

    pub fn is_owned_by(&self, profile_id: Uuid) -> bool {
        self.organizer_id == profile_id
    }

    pub fn total_price(&self, quantity: i32) -> Result<Decimal, AppError> {
        self.price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| AppError::validation("Total price is out of range"))
    }

    /// Checks a requested purchase against this snapshot of the event.
    pub fn check_purchase(&self, quantity: i32) -> Result<(), AppError> {
        if self.status != EventStatus::Approved {
            return Err(AppError::not_found(format!(
                "Event with id '{}' was not found",
                self.id
            )));
        }
        if !(1..=MAX_TICKETS_PER_PURCHASE).contains(&quantity) {
            return Err(AppError::validation(format!(
                "Quantity must be between 1 and {}",
                MAX_TICKETS_PER_PURCHASE
            )));
        }
        if self.available_tickets == 0 {
            return Err(AppError::conflict("This event is sold out"));
        }
        if quantity > self.available_tickets {
            return Err(AppError::conflict(format!(
                "Only {} ticket(s) remaining",
                self.available_tickets
            )));
        }
        Ok(())
    }

    /// Remaining inventory once capacity becomes `max_tickets`, keeping sold seats sold.
    pub fn resized_inventory(&self, max_tickets: i32) -> Result<i32, AppError> {
        let available = self.available_tickets + (max_tickets - self.max_tickets);
        if available < 0 {
            return Err(AppError::conflict(format!(
                "{} ticket(s) already sold; capacity cannot drop below that",
                self.sold_tickets()
            )));
        }
        Ok(available)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventWithOrganizer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub organizer_name: String,
    pub organizer_email: String,
}

/// Body of create and edit requests.
#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub price: Decimal,
    pub max_tickets: i32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl EventInput {
    /// Trims text fields and folds a blank image URL into `None`.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.location = self.location.trim().to_string();
        self.image_url = self
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrder {
    #[default]
    CreatedDesc,
    DateAsc,
}

/// Equality and ordering predicates understood by every data store.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    pub organizer_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub order: EventOrder,
}

impl EventQuery {
    pub fn matches(&self, event: &Event) -> bool {
        self.status.map_or(true, |s| event.status == s)
            && self.organizer_id.map_or(true, |id| event.organizer_id == id)
            && self.from_date.map_or(true, |d| event.date >= d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceFilter {
    #[default]
    All,
    Free,
    Paid,
}

impl PriceFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            PriceFilter::All => true,
            PriceFilter::Free => event.is_free(),
            PriceFilter::Paid => event.price > Decimal::ZERO,
        }
    }
}

/// Catalogue query string: `?search=jazz&price=free`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogueFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub price: PriceFilter,
}

impl CatalogueFilter {
    pub fn matches(&self, event: &Event) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                event.title.to_lowercase().contains(&term)
                    || event.location.to_lowercase().contains(&term)
            }
        };
        matches_search && self.price.matches(event)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminFilter {
    #[serde(default)]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModerationRequest {
    pub status: EventStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl EventStats {
    pub fn tally<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        events.into_iter().fold(Self::default(), |mut stats, event| {
            stats.total += 1;
            match event.status {
                EventStatus::Pending => stats.pending += 1,
                EventStatus::Approved => stats.approved += 1,
                EventStatus::Rejected => stats.rejected += 1,
            }
            stats
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_event(price: i64, max_tickets: i32, available: i32) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Concert de jazz".to_string(),
            description: "Une soirée de jazz au bord de la lagune".to_string(),
            location: "Abidjan".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            price: Decimal::from(price),
            max_tickets,
            available_tickets: available,
            image_url: None,
            status: EventStatus::Approved,
            organizer_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_pending_events_can_be_moderated() {
        use EventStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        for from in [Pending, Approved, Rejected] {
            assert!(!from.can_transition_to(Pending));
        }
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(matches!(
            Approved.transition(Rejected),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_str::<EventStatus>("\"archived\"").is_err());
        let status: EventStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, EventStatus::Approved);
    }

    #[test]
    fn test_check_purchase_bounds() {
        let event = sample_event(5000, 100, 3);

        assert!(event.check_purchase(3).is_ok());
        assert!(matches!(
            event.check_purchase(4),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            event.check_purchase(0),
            Err(AppError::ValidationError(_))
        ));

        let plenty = sample_event(5000, 100, 100);
        assert!(matches!(
            plenty.check_purchase(MAX_TICKETS_PER_PURCHASE + 1),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unapproved_event_is_not_purchasable() {
        let mut event = sample_event(0, 10, 10);
        event.status = EventStatus::Pending;
        assert!(matches!(event.check_purchase(1), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_total_price_is_price_times_quantity() {
        let event = sample_event(2500, 10, 10);
        assert_eq!(event.total_price(4).unwrap(), Decimal::from(10_000));
        assert_eq!(sample_event(0, 10, 10).total_price(3).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_total_price_overflow_is_an_error() {
        let mut event = sample_event(0, 10, 10);
        event.price = Decimal::MAX;
        assert!(matches!(
            event.total_price(2),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_max_price_total_fits_the_column() {
        let mut event = sample_event(0, 10, 10);
        event.price = max_price();
        let total = event.total_price(MAX_TICKETS_PER_PURCHASE).unwrap();
        assert!(total <= Decimal::new(999_999_999_999, PRICE_SCALE));
        assert_eq!(total, Decimal::new(999_999_999_990, PRICE_SCALE));
    }

    #[test]
    fn test_sold_out_event_says_so() {
        let event = sample_event(5000, 100, 0);
        assert!(matches!(
            event.check_purchase(1),
            Err(AppError::Conflict(ref message)) if message == "This event is sold out"
        ));
    }

    #[test]
    fn test_resized_inventory_keeps_sold_seats() {
        let event = sample_event(1000, 50, 20);
        assert_eq!(event.sold_tickets(), 30);
        assert_eq!(event.resized_inventory(60).unwrap(), 30);
        assert_eq!(event.resized_inventory(30).unwrap(), 0);
        assert!(event.resized_inventory(29).is_err());
    }

    #[test]
    fn test_catalogue_filter() {
        let paid = sample_event(1000, 10, 10);
        let free = sample_event(0, 10, 10);

        let search = CatalogueFilter {
            search: Some("JAZZ".to_string()),
            price: PriceFilter::All,
        };
        assert!(search.matches(&paid));

        let by_location = CatalogueFilter {
            search: Some("abidjan".to_string()),
            price: PriceFilter::Free,
        };
        assert!(by_location.matches(&free));
        assert!(!by_location.matches(&paid));

        let miss = CatalogueFilter {
            search: Some("théâtre".to_string()),
            price: PriceFilter::Paid,
        };
        assert!(!miss.matches(&paid));
    }

    #[test]
    fn test_event_stats_tally() {
        let mut pending = sample_event(0, 1, 1);
        pending.status = EventStatus::Pending;
        let approved = sample_event(0, 1, 1);
        let mut rejected = sample_event(0, 1, 1);
        rejected.status = EventStatus::Rejected;

        let stats = EventStats::tally([&pending, &approved, &rejected, &approved]);
        assert_eq!(
            stats,
            EventStats {
                total: 4,
                pending: 1,
                approved: 2,
                rejected: 1,
            }
        );
    }
}
