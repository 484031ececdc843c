pub mod chip_input;
pub mod consent_banner;
pub mod design_system;
pub mod job_list;
pub mod job_search;
pub mod not_found;
pub mod paging;
pub mod search_form;
