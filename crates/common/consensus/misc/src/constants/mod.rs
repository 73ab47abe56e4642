pub mod beacon;
