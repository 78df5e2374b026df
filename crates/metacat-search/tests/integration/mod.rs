mod provisioning;
mod search_service;
