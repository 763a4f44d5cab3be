mod health_tests;
