pub mod event;
pub mod profile;
pub mod ticket;

pub use event::{
    AdminFilter, CatalogueFilter, Event, EventInput, EventOrder, EventQuery,
    EventStats, EventStatus, EventWithOrganizer, ModerationRequest, PriceFilter,
    MAX_TICKETS_PER_PURCHASE,
};
pub use profile::{
    AuthSession, Credentials, LoginRequest, NewProfile, Profile, RegisterRequest, Role,
};
pub use ticket::{
    PaymentMethod, PaymentStatus, Purchase, PurchaseOrder, PurchaseRequest, Ticket, TicketPass,
    TicketWithEvent,
};
