pub mod auth_form;
pub mod help_overlay;
pub mod map_view;
pub mod project_panel;
pub mod room_details;
pub mod room_form;
pub mod room_list;
pub mod toast;
pub mod tracing_toolbar;
