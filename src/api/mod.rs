pub mod rekap;
