mod driver;
pub use driver::TimerDriver;
