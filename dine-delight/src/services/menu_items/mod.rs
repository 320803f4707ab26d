pub mod menu_items_hooks;
pub mod menu_items_shared;
