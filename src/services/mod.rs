pub mod categories;
pub mod chip_input;
pub mod chips;
pub mod consent;
pub mod consent_state;
pub mod dates;
pub mod debounce;
pub mod paging;
pub mod search_params;
pub mod suggestions;
