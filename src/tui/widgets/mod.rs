pub mod color;
pub mod confirm_delete;
pub mod entry_list;
pub mod entry_view;
pub mod filter_modal;
pub mod filters_box;
pub mod form;
pub mod help;
pub mod status_bar;
pub mod summary;
pub mod tabs;
