pub mod a001_putaway;
