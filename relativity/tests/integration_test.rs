#[macro_use]
extern crate assert_approx_eq;

use relativity::{effective_speed, lorentz_factor, ProperTime};

#[test]
pub fn uniform_acceleration_test() {
    // One second of 1 m/s² from rest, sampled at 60 Hz, with c = 1 m/s
    const C: f64 = 1.;
    const DT: f64 = 1. / 60.;

    let mut raw_speed = 0.;
    let mut clock = ProperTime::new();
    let mut gamma = 1.;

    for _ in 0..60 {
        raw_speed += 1. * DT;
        gamma = lorentz_factor(effective_speed(raw_speed, C), C);
        clock.advance(DT, gamma);
    }

    assert_approx_eq!(raw_speed, 1., 1e-9);
    assert_approx_eq!(effective_speed(raw_speed, C), 1f64.tanh(), 1e-9);
    // gamma(c * tanh(v / c)) = cosh(v / c)
    assert_approx_eq!(gamma, 1f64.cosh(), 1e-9);
    // Instantaneous rate of the moving clock at the end of the run
    assert_approx_eq!(1. / gamma, 0.6481, 1e-3);

    // Integral of sech(t) over [0, 1] is gd(1) = 0.8658, the samples lag it by half a step
    assert_approx_eq!(clock.proper(), 0.8658, 0.01);
    assert_approx_eq!(clock.coordinate(), 1., 1e-9);
    assert!(clock.proper() < clock.coordinate());
}

#[test]
pub fn slow_motion_is_nearly_classical() {
    const C: f64 = 299_792_458.;

    let speed = effective_speed(30., C);
    let gamma = lorentz_factor(speed, C);

    assert_approx_eq!(speed, 30., 1e-6);
    assert!(gamma >= 1.);
    assert_approx_eq!(gamma, 1., 1e-12);
}
