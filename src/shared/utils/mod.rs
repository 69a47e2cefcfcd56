pub mod crm_time;
