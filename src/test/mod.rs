mod dist;
mod scenario_spec;
mod signals;
mod support;
