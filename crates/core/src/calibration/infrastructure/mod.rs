pub mod calibration_worker;
