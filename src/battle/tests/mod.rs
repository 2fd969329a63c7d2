pub(crate) mod common;




#[cfg(test)]
mod test_immunity;


#[cfg(test)]
mod test_switch;
