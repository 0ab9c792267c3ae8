pub mod status_badge;
pub mod top_bar;
pub mod ui;
pub mod witcher_chip;

pub use status_badge::StatusBadge;
pub use top_bar::TopBar;
pub use witcher_chip::WitcherChip;
