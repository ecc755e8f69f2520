mod extractors_test;
