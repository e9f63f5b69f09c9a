pub mod common;

#[cfg(test)]
mod test_scheduler;






#[cfg(test)]
mod test_multi_hit;

#[cfg(test)]
mod test_struggle;

#[cfg(test)]
mod test_stat_stages;



#[cfg(test)]
mod test_end_of_turn;

#[cfg(test)]
mod test_snapshot;

#[cfg(test)]
mod test_runner;
