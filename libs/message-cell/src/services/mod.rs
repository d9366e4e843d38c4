pub mod inbox;

pub use inbox::MessageInboxService;
