mod attendance;
mod events_test;
mod health_test;
